//! The structured intent produced for a validated query.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::IntentType;

/// Structured interpretation of a request: type, scope, entities, confidence.
///
/// Produced fresh per request and never persisted. `workspaces` has set
/// semantics; `confidence` is always within `[0.0, 1.0]` once a candidate has
/// passed schema enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntentCandidate {
    pub intent_type: IntentType,
    pub workspaces: BTreeSet<String>,
    pub entities: BTreeMap<String, serde_json::Value>,
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

impl IntentCandidate {
    /// Whether every targeted workspace passes `known`.
    pub fn workspaces_within<F>(&self, known: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.workspaces.iter().all(|id| known(id))
    }
}
