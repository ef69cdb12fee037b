//! Intent types, verdict outcomes, and error kinds for IntelliQuery.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// IntentType
// ---------------------------------------------------------------------------

/// The fixed set of intents a query can resolve to.
///
/// `Unknown` is the landing spot for anything the language-understanding
/// service returns outside the enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Read,
    Update,
    Compare,
    Predict,
    Analyze,
    Unknown,
}

impl IntentType {
    /// Every member of the enumerated set, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Read,
        Self::Update,
        Self::Compare,
        Self::Predict,
        Self::Analyze,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Compare => "compare",
            Self::Predict => "predict",
            Self::Analyze => "analyze",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a model-produced label, coercing anything outside the set to
    /// [`IntentType::Unknown`]. Matching ignores case and surrounding space.
    #[must_use]
    pub fn coerce(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }

    /// All labels, for prompts and schema enums.
    #[must_use]
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownIntentType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// VerdictOutcome
// ---------------------------------------------------------------------------

/// Outcome of the two-stage validation gate.
///
/// ```text
/// coherence ── fail ──▶ rejected_incoherent
///     │
///    pass
///     ▼
/// completeness ── fail ──▶ rejected_incomplete
///     │
///    pass ──▶ accepted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    Accepted,
    RejectedIncoherent,
    RejectedIncomplete,
}

impl VerdictOutcome {
    #[must_use]
    pub const fn is_coherent(self) -> bool {
        !matches!(self, Self::RejectedIncoherent)
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Accepted)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::RejectedIncoherent => "rejected_incoherent",
            Self::RejectedIncomplete => "rejected_incomplete",
        }
    }
}

impl fmt::Display for VerdictOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Top-level classification of pipeline outcomes that are not acceptances.
///
/// `SemanticRejection` and `SchemaViolation` are expected, caller-recoverable
/// outcomes. `ExternalService` and `Configuration` are infrastructure faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SemanticRejection,
    ExternalService,
    SchemaViolation,
    Configuration,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SemanticRejection => "semantic_rejection",
            Self::ExternalService => "external_service",
            Self::SchemaViolation => "schema_violation",
            Self::Configuration => "configuration",
        }
    }

    /// Whether the kind is an infrastructure fault rather than a data outcome.
    #[must_use]
    pub const fn is_infrastructure(self) -> bool {
        matches!(self, Self::ExternalService | Self::Configuration)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
