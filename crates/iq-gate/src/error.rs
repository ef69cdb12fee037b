//! Gate error types.
//!
//! A checker that decides "no" produces a rejected verdict, never an error.
//! These errors mean a checker could not decide at all.

use std::fmt;
use std::time::Duration;

use iq_llm::LlmError;
use thiserror::Error;

/// Which gate stage a checker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Coherence,
    Completeness,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coherence => "coherence",
            Self::Completeness => "completeness",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a checker cannot produce a decision.
#[derive(Debug, Error)]
pub enum GateError {
    /// The external evaluator did not answer in time.
    #[error("{stage} check timed out after {}ms", .after.as_millis())]
    Timeout { stage: Stage, after: Duration },

    /// The external evaluator failed or answered with unusable output.
    #[error("{stage} check failed: {source}")]
    Evaluator {
        stage: Stage,
        #[source]
        source: LlmError,
    },
}

impl GateError {
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Timeout { stage, .. } | Self::Evaluator { stage, .. } => *stage,
        }
    }
}
