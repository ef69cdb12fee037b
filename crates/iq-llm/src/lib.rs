//! # iq-llm
//!
//! Language-understanding service boundary for IntelliQuery.
//!
//! - [`LanguageModel`]: the trait the orchestrator and the model-backed
//!   checkers call
//! - [`GeminiClient`]: Gemini over HTTP; also an
//!   [`EmbeddingProvider`](iq_embeddings::EmbeddingProvider)
//! - [`intent_prompt`] / [`judgment_prompt`]: prompt construction
//! - [`parse_draft`] / [`parse_judgment`]: fenced-JSON tolerant output parsing
//!
//! Implementations do not apply deadlines. Callers wrap each call in
//! `tokio::time::timeout`.

mod error;
mod gemini;
mod http;
mod parse;
mod prompt;

pub use error::LlmError;
pub use gemini::GeminiClient;
pub use parse::{IntentDraft, Judgment, parse_draft, parse_json, parse_judgment};
pub use prompt::{
    CandidateWorkspace, JudgmentKind, Prompt, PromptContext, intent_prompt, judgment_prompt,
};

use async_trait::async_trait;

/// The external language-understanding service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Produce an intent draft for a validated query and its retrieved
    /// candidate workspaces.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the service fails or its output is not JSON.
    async fn complete(&self, context: &PromptContext) -> Result<IntentDraft, LlmError>;

    /// Answer a coherence or completeness question about `query`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the service fails or its output is not a
    /// judgment.
    async fn judge(&self, kind: JudgmentKind, query: &str) -> Result<Judgment, LlmError>;

    /// Model identifier recorded in pipeline metadata.
    fn model_name(&self) -> &str;
}
