//! Cross-cutting error types for IntelliQuery.
//!
//! Domain-specific errors (e.g., `CatalogError`, `LlmError`) are defined in
//! their respective crates. The typed pipeline taxonomy lives in `iq-pipeline`
//! where all crate errors converge.

use thiserror::Error;

/// Errors that can be raised by any IntelliQuery crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The query was empty after trimming whitespace.
    #[error("Query is empty")]
    EmptyQuery,

    /// A string did not name a known intent type.
    #[error("Unknown intent type: {0}")]
    UnknownIntentType(String),

    /// A verdict payload violated the coherence/validity invariant.
    #[error("Inconsistent verdict: {0}")]
    InconsistentVerdict(String),
}
