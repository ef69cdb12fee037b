//! Typed pipeline failures.
//!
//! A rejected query is not an error: it is a verdict. Everything here is a
//! fault the caller has to handle, classified by [`ErrorKind`].

use std::fmt;
use std::time::Duration;

use iq_catalog::CatalogError;
use iq_core::enums::ErrorKind;
use iq_embeddings::EmbeddingError;
use iq_gate::GateError;
use iq_llm::LlmError;
use iq_schema::{SchemaError, Violation};
use thiserror::Error;

/// External collaborator that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Embedding,
    LanguageModel,
}

impl Service {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::LanguageModel => "language_model",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an external call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFailure {
    Timeout,
    Unavailable,
    RateLimited { retry_after_secs: u64 },
    Malformed,
}

impl ServiceFailure {
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::Malformed)
    }

    #[must_use]
    pub const fn from_llm(err: &LlmError) -> Self {
        match err {
            LlmError::RateLimited { retry_after_secs } => Self::RateLimited {
                retry_after_secs: *retry_after_secs,
            },
            LlmError::Malformed(_) => Self::Malformed,
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::Unavailable(_) => {
                Self::Unavailable
            }
        }
    }

    #[must_use]
    pub const fn from_embedding(err: &EmbeddingError) -> Self {
        match err {
            EmbeddingError::RateLimited { retry_after_secs } => Self::RateLimited {
                retry_after_secs: *retry_after_secs,
            },
            EmbeddingError::Malformed(_) | EmbeddingError::EmptyResult => Self::Malformed,
            EmbeddingError::InitFailed(_)
            | EmbeddingError::EmbedFailed(_)
            | EmbeddingError::Unavailable(_) => Self::Unavailable,
        }
    }
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::RateLimited { retry_after_secs } => {
                write!(f, "rate limited (retry after {retry_after_secs}s)")
            }
            Self::Malformed => f.write_str("returned malformed output"),
        }
    }
}

/// Errors returned by the orchestrator and the pipeline facade.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Embedding or language-understanding call failed.
    #[error("{service} service {failure}: {message}")]
    ExternalService {
        service: Service,
        failure: ServiceFailure,
        message: String,
    },

    /// The model's draft broke the intent shape contract.
    #[error("Intent schema violated: {}", Violation::summarize(.0))]
    SchemaViolation(Vec<Violation>),

    /// A required collaborator or data source is missing.
    #[error("Pipeline is not operational: {0}")]
    Configuration(String),

    /// A validation checker could not decide.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Catalog or index sources failed to load.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl PipelineError {
    #[must_use]
    pub fn timeout(service: Service, after: Duration) -> Self {
        Self::ExternalService {
            service,
            failure: ServiceFailure::Timeout,
            message: format!("no answer within {}ms", after.as_millis()),
        }
    }

    #[must_use]
    pub fn from_llm(err: &LlmError) -> Self {
        Self::ExternalService {
            service: Service::LanguageModel,
            failure: ServiceFailure::from_llm(err),
            message: err.to_string(),
        }
    }

    #[must_use]
    pub fn from_embedding(err: &EmbeddingError) -> Self {
        Self::ExternalService {
            service: Service::Embedding,
            failure: ServiceFailure::from_embedding(err),
            message: err.to_string(),
        }
    }

    /// Taxonomy class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ExternalService { .. } | Self::Gate(_) => ErrorKind::ExternalService,
            Self::SchemaViolation(_) => ErrorKind::SchemaViolation,
            Self::Configuration(_) | Self::Catalog(_) => ErrorKind::Configuration,
        }
    }

    /// Whether repeating the same call could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ExternalService { failure, .. } => failure.is_retryable(),
            Self::Gate(GateError::Timeout { .. }) => true,
            Self::Gate(GateError::Evaluator { source, .. }) => {
                ServiceFailure::from_llm(source).is_retryable()
            }
            Self::SchemaViolation(_) | Self::Configuration(_) | Self::Catalog(_) => false,
        }
    }

    /// Seconds to wait before retrying, when the service said so.
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::ExternalService {
                failure: ServiceFailure::RateLimited { retry_after_secs },
                ..
            } => Some(*retry_after_secs),
            Self::Gate(GateError::Evaluator { source, .. }) => source.retry_after_secs(),
            _ => None,
        }
    }
}

impl From<SchemaError> for PipelineError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Violations(violations) => Self::SchemaViolation(violations),
            other => Self::Configuration(other.to_string()),
        }
    }
}
