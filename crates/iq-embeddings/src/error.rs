//! Embedding provider failures.

/// Why a text could not be turned into a vector.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The local model could not be loaded (download, ONNX runtime, cache).
    #[error("embedding model failed to load: {0}")]
    InitFailed(String),

    /// Inference ran and failed.
    #[error("embedding failed: {0}")]
    EmbedFailed(String),

    /// No vector came back for a non-empty input.
    #[error("embedding provider returned no vector")]
    EmptyResult,

    /// The remote provider could not be reached or answered with an error.
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("embedding provider rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The remote provider answered with something unparseable.
    #[error("malformed embedding response: {0}")]
    Malformed(String),
}
