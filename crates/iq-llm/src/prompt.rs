//! Prompt construction for intent drafts and model-backed validation.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use iq_core::enums::IntentType;
use iq_core::workspace::WorkspaceEntry;
use serde::{Deserialize, Serialize};

/// A catalog entry retrieved for the query, as shown to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateWorkspace {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub schema_hints: BTreeMap<String, String>,
    /// Similarity of the entry to the query.
    pub score: f64,
}

impl CandidateWorkspace {
    #[must_use]
    pub fn from_entry(entry: &WorkspaceEntry, score: f64) -> Self {
        Self {
            id: entry.id.clone(),
            display_name: entry.display_name.clone(),
            description: entry.description.clone(),
            schema_hints: entry.schema_hints.clone(),
            score,
        }
    }
}

/// Everything the model sees for one intent draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub query: String,
    /// Retrieved workspaces, best match first.
    pub candidates: Vec<CandidateWorkspace>,
}

impl PromptContext {
    #[must_use]
    pub fn new(query: impl Into<String>, candidates: Vec<CandidateWorkspace>) -> Self {
        Self {
            query: query.into(),
            candidates,
        }
    }
}

/// A system instruction and a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Which question a model-backed checker asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgmentKind {
    Coherence,
    Completeness,
}

impl JudgmentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coherence => "coherence",
            Self::Completeness => "completeness",
        }
    }
}

/// Build the intent-extraction prompt.
#[must_use]
pub fn intent_prompt(context: &PromptContext) -> Prompt {
    let labels = IntentType::labels().join(", ");
    let system = format!(
        "You extract structured intent from business data questions.\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"intent_type\": string, \"workspaces\": [string], \"entities\": object, \"confidence\": number}}\n\
         RULES:\n\
         1. intent_type is one of: {labels}. Use \"unknown\" when none fits.\n\
         2. workspaces only contains ids from the CANDIDATE WORKSPACES list.\n\
         3. entities maps short snake_case names to values taken from the question \
         (places, periods, products, metrics, filters).\n\
         4. confidence is between 0.0 and 1.0."
    );

    let mut user = String::new();
    let _ = writeln!(user, "QUESTION: {}", context.query);
    let _ = writeln!(user);
    let _ = writeln!(user, "CANDIDATE WORKSPACES:");
    if context.candidates.is_empty() {
        let _ = writeln!(user, "(none)");
    }
    for candidate in &context.candidates {
        let _ = write!(
            user,
            "- {} ({}, score {:.3})",
            candidate.id, candidate.display_name, candidate.score
        );
        if !candidate.description.is_empty() {
            let _ = write!(user, ": {}", candidate.description);
        }
        let _ = writeln!(user);
        if !candidate.schema_hints.is_empty() {
            let fields: Vec<String> = candidate
                .schema_hints
                .iter()
                .map(|(field, ty)| format!("{field}: {ty}"))
                .collect();
            let _ = writeln!(user, "  fields: {}", fields.join(", "));
        }
    }

    Prompt { system, user }
}

/// Build the prompt for a coherence or completeness judgment.
#[must_use]
pub fn judgment_prompt(kind: JudgmentKind, query: &str) -> Prompt {
    let question = match kind {
        JudgmentKind::Coherence => {
            "Is the text a linguistically coherent request written in natural language? \
             Gibberish, random characters and word salad are not coherent."
        }
        JudgmentKind::Completeness => {
            "Is the request complete enough to act on? It needs a specific subject, \
             an implied action, and a bounded scope. Vague requests such as \
             \"update status\" are not complete."
        }
    };
    let system = format!(
        "You review user questions before they reach a data assistant.\n\
         {question}\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"ok\": boolean, \"reasons\": [string]}}\n\
         Give at least one reason when ok is false."
    );
    Prompt {
        system,
        user: format!("TEXT: {query}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        let entry = WorkspaceEntry::new("sales", "Sales")
            .with_description("Sales orders and revenue")
            .with_hint("city", "string");
        PromptContext::new(
            "Show me sales in Mumbai for last month",
            vec![CandidateWorkspace::from_entry(&entry, 0.8124)],
        )
    }

    #[test]
    fn intent_prompt_lists_labels_and_candidates() {
        let prompt = intent_prompt(&context());
        assert!(prompt.system.contains("read, update, compare, predict, analyze, unknown"));
        assert!(prompt.user.contains("QUESTION: Show me sales in Mumbai for last month"));
        assert!(prompt.user.contains("- sales (Sales, score 0.812"));
        assert!(prompt.user.contains("fields: city: string"));
    }

    #[test]
    fn intent_prompt_without_candidates() {
        let prompt = intent_prompt(&PromptContext::new("Show me sales", Vec::new()));
        assert!(prompt.user.contains("(none)"));
    }

    #[test]
    fn judgment_prompts_differ_by_kind() {
        let coherence = judgment_prompt(JudgmentKind::Coherence, "asdkj qwoeiru");
        let completeness = judgment_prompt(JudgmentKind::Completeness, "asdkj qwoeiru");
        assert_ne!(coherence.system, completeness.system);
        assert_eq!(coherence.user, "TEXT: asdkj qwoeiru");
    }
}
