//! Checker traits and their per-stage result.

use async_trait::async_trait;
use iq_core::query::Query;
use iq_core::verdict::Diagnostics;

use crate::error::GateError;

/// Decision of one checker.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub passed: bool,
    /// Why the stage failed. Empty when it passed.
    pub reasons: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl StageOutcome {
    #[must_use]
    pub const fn pass(diagnostics: Diagnostics) -> Self {
        Self {
            passed: true,
            reasons: Vec::new(),
            diagnostics,
        }
    }

    #[must_use]
    pub const fn fail(reasons: Vec<String>, diagnostics: Diagnostics) -> Self {
        Self {
            passed: false,
            reasons,
            diagnostics,
        }
    }
}

/// Stage 1: is the text recognizable as a request at all.
#[async_trait]
pub trait CoherenceCheck: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GateError`] only when the checker cannot decide.
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError>;

    fn name(&self) -> &str;
}

/// Stage 2: does the request have a subject, an action and a bounded scope.
#[async_trait]
pub trait CompletenessCheck: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GateError`] only when the checker cannot decide.
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError>;

    fn name(&self) -> &str;
}
