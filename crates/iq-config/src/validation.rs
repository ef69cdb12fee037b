//! Validation gate checker selection.

use serde::{Deserialize, Serialize};

/// Backend for one stage of the validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckerKind {
    /// Deterministic lexical rules.
    Heuristic,
    /// Judgment delegated to the language-understanding service.
    Model,
}

const fn default_checker() -> CheckerKind {
    CheckerKind::Heuristic
}

const fn default_min_recognized_ratio() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default = "default_checker")]
    pub coherence: CheckerKind,

    #[serde(default = "default_checker")]
    pub completeness: CheckerKind,

    /// Share of tokens that must be recognizable words for a query to count
    /// as coherent under the heuristic checker.
    #[serde(default = "default_min_recognized_ratio")]
    pub min_recognized_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            coherence: default_checker(),
            completeness: default_checker(),
            min_recognized_ratio: default_min_recognized_ratio(),
        }
    }
}

impl ValidationConfig {
    /// Whether any stage needs the language-understanding service.
    #[must_use]
    pub fn uses_model(&self) -> bool {
        self.coherence == CheckerKind::Model || self.completeness == CheckerKind::Model
    }
}
