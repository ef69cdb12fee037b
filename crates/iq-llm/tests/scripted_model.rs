//! The `LanguageModel` trait is object safe and usable behind `Arc<dyn _>`.

use std::sync::Arc;

use async_trait::async_trait;
use iq_core::workspace::WorkspaceEntry;
use iq_llm::{
    CandidateWorkspace, IntentDraft, Judgment, JudgmentKind, LanguageModel, LlmError,
    PromptContext, intent_prompt, parse_draft, parse_judgment,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Replies with fixed text, parsed the same way the Gemini client parses.
struct Scripted {
    draft: &'static str,
    judgment: &'static str,
}

#[async_trait]
impl LanguageModel for Scripted {
    async fn complete(&self, context: &PromptContext) -> Result<IntentDraft, LlmError> {
        assert!(intent_prompt(context).user.contains(&context.query));
        parse_draft(self.draft)
    }

    async fn judge(&self, _kind: JudgmentKind, _query: &str) -> Result<Judgment, LlmError> {
        parse_judgment(self.judgment)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn scripted_model_behind_arc() {
    let model: Arc<dyn LanguageModel> = Arc::new(Scripted {
        draft: "```json\n{\"intent_type\": \"read\", \"workspaces\": [\"sales\"], \"entities\": {}, \"confidence\": 0.9}\n```",
        judgment: r#"{"ok": false, "reasons": ["missing subject"]}"#,
    });

    let entry = WorkspaceEntry::new("sales", "Sales");
    let context = PromptContext::new(
        "Show me sales in Mumbai for last month",
        vec![CandidateWorkspace::from_entry(&entry, 0.7)],
    );

    let draft = model.complete(&context).await.unwrap();
    assert_eq!(draft["workspaces"], json!(["sales"]));

    let judgment = model
        .judge(JudgmentKind::Completeness, "Update status")
        .await
        .unwrap();
    assert!(!judgment.ok);
    assert_eq!(model.model_name(), "scripted");
}

#[tokio::test]
async fn prose_only_reply_is_malformed() {
    let model = Scripted {
        draft: "I am not sure what you mean.",
        judgment: "yes",
    };
    let context = PromptContext::new("Show me sales", Vec::new());
    assert!(matches!(
        model.complete(&context).await,
        Err(LlmError::Malformed(_))
    ));
    assert!(matches!(
        model.judge(JudgmentKind::Coherence, "Show me sales").await,
        Err(LlmError::Malformed(_))
    ));
}
