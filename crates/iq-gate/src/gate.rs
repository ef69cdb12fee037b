//! The two-stage validation gate.

use std::sync::Arc;

use iq_core::query::Query;
use iq_core::verdict::{Diagnostics, ValidationVerdict};
use serde_json::{Map, Value};

use crate::check::{CoherenceCheck, CompletenessCheck, StageOutcome};
use crate::coherence::LexicalCoherence;
use crate::completeness::HeuristicCompleteness;
use crate::error::GateError;

/// Runs coherence, then completeness, and folds the results into a verdict.
///
/// Completeness is never consulted for an incoherent query. The gate holds no
/// mutable state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct ValidationGate {
    coherence: Arc<dyn CoherenceCheck>,
    completeness: Arc<dyn CompletenessCheck>,
}

impl Default for ValidationGate {
    fn default() -> Self {
        Self::new(
            Arc::new(LexicalCoherence::default()),
            Arc::new(HeuristicCompleteness),
        )
    }
}

impl ValidationGate {
    #[must_use]
    pub fn new(
        coherence: Arc<dyn CoherenceCheck>,
        completeness: Arc<dyn CompletenessCheck>,
    ) -> Self {
        Self {
            coherence,
            completeness,
        }
    }

    /// Names of the configured checkers, `(coherence, completeness)`.
    #[must_use]
    pub fn checker_names(&self) -> (&str, &str) {
        (self.coherence.name(), self.completeness.name())
    }

    /// Decide whether `query` may proceed to intent extraction.
    ///
    /// `raw_diagnostics` holds one object per stage that ran, keyed
    /// `coherence` and `completeness`, each tagged with the checker name.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when a checker cannot decide. A negative decision
    /// is a rejected verdict, not an error.
    pub async fn validate(&self, query: &Query) -> Result<ValidationVerdict, GateError> {
        let mut diagnostics = Diagnostics::new();

        let coherence = self.coherence.check(query).await?;
        record(&mut diagnostics, "coherence", self.coherence.name(), &coherence);
        if !coherence.passed {
            tracing::warn!(
                query_len = query.char_len(),
                checker = self.coherence.name(),
                reasons = ?coherence.reasons,
                "query rejected as incoherent"
            );
            return Ok(ValidationVerdict::incoherent(coherence.reasons, diagnostics));
        }

        let completeness = self.completeness.check(query).await?;
        record(
            &mut diagnostics,
            "completeness",
            self.completeness.name(),
            &completeness,
        );
        if !completeness.passed {
            tracing::warn!(
                query_len = query.char_len(),
                checker = self.completeness.name(),
                reasons = ?completeness.reasons,
                "query rejected as incomplete"
            );
            return Ok(ValidationVerdict::incomplete(
                completeness.reasons,
                diagnostics,
            ));
        }

        tracing::debug!(query_len = query.char_len(), "query accepted");
        Ok(ValidationVerdict::accepted(Vec::new(), diagnostics))
    }
}

fn record(diagnostics: &mut Diagnostics, stage: &str, checker: &str, outcome: &StageOutcome) {
    let mut entry = Map::new();
    entry.insert("checker".into(), Value::String(checker.to_string()));
    entry.insert("passed".into(), Value::Bool(outcome.passed));
    entry.extend(
        outcome
            .diagnostics
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    diagnostics.insert(stage.to_string(), Value::Object(entry));
}
