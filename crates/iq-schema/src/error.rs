//! Registry and intent-contract failures.

use thiserror::Error;

use crate::validator::Violation;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema is registered under this name.
    #[error("unknown schema: {0}")]
    NotFound(String),

    /// A document failed JSON Schema validation against a registered schema.
    #[error("document does not match schema: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    /// An intent candidate broke the intent shape contract.
    #[error("Intent schema violated: {}", Violation::summarize(.0))]
    Violations(Vec<Violation>),

    /// A registered schema failed to compile.
    #[error("schema failed to compile: {0}")]
    Generation(String),
}
