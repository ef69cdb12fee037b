//! Deterministic completeness check: action cue plus specific subject.

use async_trait::async_trait;
use iq_core::query::Query;
use iq_core::verdict::Diagnostics;
use serde_json::json;

use crate::check::{CompletenessCheck, StageOutcome};
use crate::error::GateError;
use crate::lexicon::{
    is_action_verb, is_ambiguous, is_interrogative, is_scope_marker, is_stopword, tokenize,
};

/// Requires the query to say what to do and what to do it to.
///
/// - action: an action verb or an interrogative anywhere in the query
/// - subject: a content word that is not the action, a function word, a scope
///   marker, or a generic noun such as "status" or "data"
///
/// A request whose only object is a generic noun ("update status", "show
/// everything") has no bounded scope and is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCompleteness;

impl HeuristicCompleteness {
    #[must_use]
    pub fn evaluate(self, text: &str) -> StageOutcome {
        let tokens = tokenize(text);

        let action = tokens
            .iter()
            .find(|t| is_action_verb(t) || is_interrogative(t))
            .cloned();
        let ambiguous: Vec<&String> = tokens.iter().filter(|t| is_ambiguous(t)).collect();
        let scope: Vec<&String> = tokens.iter().filter(|t| is_scope_marker(t)).collect();
        let subjects: Vec<&String> = tokens
            .iter()
            .filter(|t| Some(*t) != action.as_ref())
            .filter(|t| {
                !(is_stopword(t)
                    || is_interrogative(t)
                    || is_ambiguous(t)
                    || is_scope_marker(t))
            })
            .collect();

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert("action".into(), json!(action));
        diagnostics.insert("subject_candidates".into(), json!(subjects));
        diagnostics.insert("ambiguous_terms".into(), json!(ambiguous));
        diagnostics.insert("scope_markers".into(), json!(scope));

        let mut reasons = Vec::new();
        if action.is_none() {
            reasons.push(
                "no action: say what should be done (show, compare, update, predict, ...)"
                    .to_string(),
            );
        }
        if subjects.is_empty() {
            if ambiguous.is_empty() {
                reasons.push("no subject: name the data the request is about".to_string());
            } else {
                let terms: Vec<&str> = ambiguous.iter().map(|s| s.as_str()).collect();
                reasons.push(format!(
                    "subject is ambiguous: \"{}\" does not identify which data is meant",
                    terms.join("\", \"")
                ));
            }
        }

        if reasons.is_empty() {
            StageOutcome::pass(diagnostics)
        } else {
            StageOutcome::fail(reasons, diagnostics)
        }
    }
}

#[async_trait]
impl CompletenessCheck for HeuristicCompleteness {
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError> {
        Ok(self.evaluate(query.as_str()))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
