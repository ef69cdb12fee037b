//! Embedding provider selection.

use serde::{Deserialize, Serialize};

/// Which embedding backend produces query and catalog vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Gemini `embedContent` over HTTP.
    Gemini,
    /// Deterministic feature hashing, no network access.
    Hashing,
    /// fastembed ONNX model (requires the `local` feature of `iq-embeddings`).
    Local,
}

/// Default dimensionality of the hashing embedder.
const fn default_dimension() -> usize {
    256
}

const fn default_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::Hashing
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_provider")]
    pub provider: EmbeddingProviderKind,

    /// Vector width for the hashing embedder. Ignored by model-backed providers.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimension: default_dimension(),
        }
    }
}
