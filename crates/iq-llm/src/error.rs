//! Language-understanding service error types.

use thiserror::Error;

/// Errors from calls to the language-understanding service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The service answered, but not with anything we can parse.
    #[error("malformed model output: {0}")]
    Malformed(String),

    /// The service is not configured or refused to answer.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl LlmError {
    /// Seconds the service asked us to wait, for rate-limit errors.
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl From<LlmError> for iq_embeddings::EmbeddingError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            LlmError::Malformed(message) => Self::Malformed(message),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
