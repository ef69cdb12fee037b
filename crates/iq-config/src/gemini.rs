//! Gemini language-understanding and embedding service configuration.

use serde::{Deserialize, Serialize};

/// Default per-call timeout for external service calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// [`DEFAULT_TIMEOUT_SECS`] as a `Duration`.
pub const DEFAULT_SERVICE_TIMEOUT: std::time::Duration =
    std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS);

fn default_model() -> String {
    String::from("gemini-1.5-flash")
}

fn default_embedding_model() -> String {
    String::from("text-embedding-004")
}

fn default_endpoint() -> String {
    String::from("https://generativelanguage.googleapis.com/v1beta")
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    /// API key sent as the `x-goog-api-key` header.
    #[serde(default)]
    pub api_key: String,

    /// Model used for intent drafts and model-backed validation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for query and catalog embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// API base URL, without a trailing slash.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout applied to each individual call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Check if the Gemini config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.endpoint.is_empty()
    }

    #[must_use]
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
