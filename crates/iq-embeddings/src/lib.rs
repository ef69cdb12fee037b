//! # iq-embeddings
//!
//! Embedding provider boundary for IntelliQuery.
//!
//! The orchestrator only sees [`EmbeddingProvider`]. Implementations:
//! - [`HashingEmbedder`]: deterministic feature hashing, no network, used for
//!   offline operation and tests
//! - `LocalEmbeddingEngine` (feature `local`): fastembed `AllMiniLML6V2`,
//!   384-dimensional vectors, model cached at `~/.intelliquery/cache/fastembed/`
//! - `GeminiClient` in `iq-llm`: remote `embedContent` calls
//!
//! Providers never apply timeouts themselves; the caller owns the deadline.

pub mod error;
mod hashing;
#[cfg(feature = "local")]
mod local;

pub use error::EmbeddingError;
pub use hashing::HashingEmbedder;
#[cfg(feature = "local")]
pub use local::LocalEmbeddingEngine;

use async_trait::async_trait;

/// Source of embedding vectors for queries and catalog entries.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError`] when the backend fails or answers with no vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts, one vector per input in input order.
    ///
    /// The default implementation embeds sequentially.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmbeddingError`] encountered.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Provider name for logs and metadata.
    fn name(&self) -> &str;

    /// Output width when known ahead of time.
    fn dimension(&self) -> Option<usize> {
        None
    }
}
