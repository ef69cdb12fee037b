//! Deterministic coherence check based on word recognition.

use std::collections::BTreeSet;

use async_trait::async_trait;
use iq_core::query::Query;
use iq_core::verdict::Diagnostics;
use serde_json::json;

use crate::check::{CoherenceCheck, StageOutcome};
use crate::error::GateError;
use crate::lexicon::{is_implausible, is_known, singular, tokenize};

/// Share of recognized tokens required when none is configured.
pub const DEFAULT_MIN_RECOGNIZED_RATIO: f64 = 0.5;

/// Accepts a query when it reads as language rather than keyboard noise.
///
/// A token is recognized when the built-in lexicon or the catalog vocabulary
/// knows it (or its singular form), or when it is a number. Unknown tokens
/// that look pronounceable (place names, brands, jargon) are neutral: the
/// recognized ratio is taken over recognized plus implausible tokens only.
/// At least one token must be recognized.
#[derive(Debug, Clone)]
pub struct LexicalCoherence {
    vocabulary: BTreeSet<String>,
    min_recognized_ratio: f64,
}

impl Default for LexicalCoherence {
    fn default() -> Self {
        Self::new(BTreeSet::new(), DEFAULT_MIN_RECOGNIZED_RATIO)
    }
}

impl LexicalCoherence {
    /// `vocabulary` is lowercased words from the workspace catalog.
    #[must_use]
    pub fn new(vocabulary: BTreeSet<String>, min_recognized_ratio: f64) -> Self {
        Self {
            vocabulary,
            min_recognized_ratio: min_recognized_ratio.clamp(0.0, 1.0),
        }
    }

    fn recognizes(&self, token: &str) -> bool {
        is_known(token)
            || self.vocabulary.contains(token)
            || singular(token).is_some_and(|s| self.vocabulary.contains(s))
            || token.chars().all(|c| c.is_ascii_digit())
    }

    /// The synchronous decision, shared by the trait impl and tests.
    #[must_use]
    pub fn evaluate(&self, text: &str) -> StageOutcome {
        let tokens = tokenize(text);
        let (recognized, unrecognized): (Vec<&String>, Vec<&String>) =
            tokens.iter().partition(|t| self.recognizes(t));
        let implausible: Vec<&String> = unrecognized
            .iter()
            .copied()
            .filter(|t| is_implausible(t))
            .collect();

        let judged = recognized.len() + implausible.len();
        #[allow(clippy::cast_precision_loss)]
        let ratio = if judged == 0 {
            0.0
        } else {
            recognized.len() as f64 / judged as f64
        };

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert("token_count".into(), json!(tokens.len()));
        diagnostics.insert("recognized_count".into(), json!(recognized.len()));
        diagnostics.insert("judged_count".into(), json!(judged));
        diagnostics.insert("recognized_ratio".into(), json!(ratio));
        diagnostics.insert("min_recognized_ratio".into(), json!(self.min_recognized_ratio));
        diagnostics.insert("unrecognized_tokens".into(), json!(unrecognized));
        diagnostics.insert("implausible_tokens".into(), json!(implausible));

        if tokens.is_empty() {
            return StageOutcome::fail(vec!["query contains no words".to_string()], diagnostics);
        }
        if recognized.is_empty() || ratio < self.min_recognized_ratio {
            let mut reasons = vec![if recognized.is_empty() {
                "no recognizable words".to_string()
            } else {
                format!(
                    "only {} of {} words are recognizable",
                    recognized.len(),
                    judged
                )
            }];
            if !implausible.is_empty() {
                let words: Vec<&str> = implausible.iter().map(|s| s.as_str()).collect();
                reasons.push(format!("looks like random characters: {}", words.join(", ")));
            }
            return StageOutcome::fail(reasons, diagnostics);
        }
        StageOutcome::pass(diagnostics)
    }
}

#[async_trait]
impl CoherenceCheck for LexicalCoherence {
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError> {
        Ok(self.evaluate(query.as_str()))
    }

    fn name(&self) -> &str {
        "lexical"
    }
}
