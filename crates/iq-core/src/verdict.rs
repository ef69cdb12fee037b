//! The validation gate's verdict.
//!
//! A verdict is an explicitly tagged [`VerdictOutcome`]. The `is_coherent` and
//! `is_valid` flags travel alongside the tag on the wire so transport shells can
//! read them directly, but they are always derived from the tag and never set
//! independently.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::VerdictOutcome;
use crate::errors::CoreError;

/// Structured diagnostics attached to a verdict, keyed by checker-defined names.
pub type Diagnostics = BTreeMap<String, serde_json::Value>;

/// Accept/reject decision of the validation gate with diagnostic detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "VerdictRepr")]
pub struct ValidationVerdict {
    outcome: VerdictOutcome,
    is_coherent: bool,
    is_valid: bool,
    reasons: Vec<String>,
    raw_diagnostics: Diagnostics,
}

impl ValidationVerdict {
    #[must_use]
    pub fn accepted(reasons: Vec<String>, raw_diagnostics: Diagnostics) -> Self {
        Self::with_outcome(VerdictOutcome::Accepted, reasons, raw_diagnostics)
    }

    #[must_use]
    pub fn incoherent(reasons: Vec<String>, raw_diagnostics: Diagnostics) -> Self {
        Self::with_outcome(VerdictOutcome::RejectedIncoherent, reasons, raw_diagnostics)
    }

    #[must_use]
    pub fn incomplete(reasons: Vec<String>, raw_diagnostics: Diagnostics) -> Self {
        Self::with_outcome(VerdictOutcome::RejectedIncomplete, reasons, raw_diagnostics)
    }

    #[must_use]
    pub const fn with_outcome(
        outcome: VerdictOutcome,
        reasons: Vec<String>,
        raw_diagnostics: Diagnostics,
    ) -> Self {
        Self {
            outcome,
            is_coherent: outcome.is_coherent(),
            is_valid: outcome.is_valid(),
            reasons,
            raw_diagnostics,
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> VerdictOutcome {
        self.outcome
    }

    #[must_use]
    pub const fn is_coherent(&self) -> bool {
        self.is_coherent
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self.outcome, VerdictOutcome::Accepted)
    }

    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    #[must_use]
    pub const fn raw_diagnostics(&self) -> &Diagnostics {
        &self.raw_diagnostics
    }
}

/// Wire form used when reading a verdict back in.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
struct VerdictRepr {
    outcome: VerdictOutcome,
    is_coherent: bool,
    is_valid: bool,
    #[serde(default)]
    reasons: Vec<String>,
    #[serde(default)]
    raw_diagnostics: Diagnostics,
}

impl TryFrom<VerdictRepr> for ValidationVerdict {
    type Error = CoreError;

    fn try_from(repr: VerdictRepr) -> Result<Self, Self::Error> {
        if repr.is_valid && !repr.is_coherent {
            return Err(CoreError::InconsistentVerdict(
                "is_valid asserted on an incoherent query".to_string(),
            ));
        }
        if repr.is_coherent != repr.outcome.is_coherent() || repr.is_valid != repr.outcome.is_valid()
        {
            return Err(CoreError::InconsistentVerdict(format!(
                "flags (is_coherent={}, is_valid={}) disagree with outcome {}",
                repr.is_coherent, repr.is_valid, repr.outcome
            )));
        }
        Ok(Self::with_outcome(
            repr.outcome,
            repr.reasons,
            repr.raw_diagnostics,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_follow_outcome() {
        let verdict = ValidationVerdict::incoherent(vec!["gibberish".into()], Diagnostics::new());
        assert!(!verdict.is_coherent());
        assert!(!verdict.is_valid());
        assert!(!verdict.is_accepted());

        let verdict = ValidationVerdict::accepted(Vec::new(), Diagnostics::new());
        assert!(verdict.is_coherent());
        assert!(verdict.is_valid());
    }

    #[test]
    fn serializes_flags_next_to_outcome() {
        let verdict = ValidationVerdict::incomplete(vec!["no subject".into()], Diagnostics::new());
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outcome": "rejected_incomplete",
                "is_coherent": true,
                "is_valid": false,
                "reasons": ["no subject"],
                "raw_diagnostics": {}
            })
        );
    }

    #[test]
    fn deserialize_rejects_valid_but_incoherent() {
        let json = serde_json::json!({
            "outcome": "rejected_incoherent",
            "is_coherent": false,
            "is_valid": true,
        });
        assert!(serde_json::from_value::<ValidationVerdict>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_flags_disagreeing_with_outcome() {
        let json = serde_json::json!({
            "outcome": "accepted",
            "is_coherent": true,
            "is_valid": false,
        });
        assert!(serde_json::from_value::<ValidationVerdict>(json).is_err());
    }

    #[test]
    fn deserialize_accepts_consistent_payload() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.insert("token_count".into(), serde_json::json!(7));
        let original = ValidationVerdict::accepted(vec!["ok".into()], diagnostics);
        let json = serde_json::to_string(&original).unwrap();
        let recovered: ValidationVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, original);
    }
}
