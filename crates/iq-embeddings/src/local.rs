//! Local embedding engine backed by fastembed (ONNX runtime).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::{EmbeddingError, EmbeddingProvider};

/// Wraps the `AllMiniLML6V2` model to produce 384-dimensional float vectors.
///
/// Model files are downloaded on first use and cached at
/// `~/.intelliquery/cache/fastembed/`.
///
/// [`TextEmbedding::embed`] requires `&mut self`, so the model sits behind a
/// mutex and inference runs on the blocking pool.
#[derive(Clone)]
pub struct LocalEmbeddingEngine {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbeddingEngine {
    /// Create a new embedding engine with the `AllMiniLML6V2` model.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new() -> Result<Self, EmbeddingError> {
        let cache_dir = dirs::home_dir().map_or_else(
            || std::path::PathBuf::from(".fastembed_cache"),
            |h| h.join(".intelliquery").join("cache").join("fastembed"),
        );

        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }

    fn embed_blocking(
        model: &Mutex<TextEmbedding>,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut guard = model
            .lock()
            .map_err(|_| EmbeddingError::EmbedFailed("embedding model lock poisoned".into()))?;
        guard
            .embed(texts, None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || Self::embed_blocking(&model, texts))
            .await
            .map_err(|e| EmbeddingError::EmbedFailed(format!("embedding task failed: {e}")))?
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingEngine {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.run(vec![text.to_string()]).await?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.run(texts.to_vec()).await
    }

    fn name(&self) -> &str {
        "fastembed"
    }

    fn dimension(&self) -> Option<usize> {
        Some(384)
    }
}
