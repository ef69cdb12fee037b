//! Checkers that delegate the judgment to the language-understanding service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use iq_core::query::Query;
use iq_core::verdict::Diagnostics;
use iq_llm::{JudgmentKind, LanguageModel};
use serde_json::json;

use crate::check::{CoherenceCheck, CompletenessCheck, StageOutcome};
use crate::error::{GateError, Stage};

async fn judge(
    model: &dyn LanguageModel,
    stage: Stage,
    query: &Query,
    timeout: Duration,
) -> Result<StageOutcome, GateError> {
    let kind = match stage {
        Stage::Coherence => JudgmentKind::Coherence,
        Stage::Completeness => JudgmentKind::Completeness,
    };
    let judgment = tokio::time::timeout(timeout, model.judge(kind, query.as_str()))
        .await
        .map_err(|_| GateError::Timeout {
            stage,
            after: timeout,
        })?
        .map_err(|source| GateError::Evaluator { stage, source })?;

    let mut diagnostics = Diagnostics::new();
    diagnostics.insert("model".into(), json!(model.model_name()));
    diagnostics.insert("model_reasons".into(), json!(judgment.reasons));

    if judgment.ok {
        Ok(StageOutcome::pass(diagnostics))
    } else {
        let mut reasons = judgment.reasons;
        if reasons.is_empty() {
            reasons.push(format!("{stage} check rejected the query"));
        }
        Ok(StageOutcome::fail(reasons, diagnostics))
    }
}

/// Coherence judged by the language model, bounded by `timeout`.
#[derive(Clone)]
pub struct ModelCoherence {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl ModelCoherence {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }
}

#[async_trait]
impl CoherenceCheck for ModelCoherence {
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError> {
        judge(self.model.as_ref(), Stage::Coherence, query, self.timeout).await
    }

    fn name(&self) -> &str {
        "model"
    }
}

/// Completeness judged by the language model, bounded by `timeout`.
#[derive(Clone)]
pub struct ModelCompleteness {
    model: Arc<dyn LanguageModel>,
    timeout: Duration,
}

impl ModelCompleteness {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }
}

#[async_trait]
impl CompletenessCheck for ModelCompleteness {
    async fn check(&self, query: &Query) -> Result<StageOutcome, GateError> {
        judge(self.model.as_ref(), Stage::Completeness, query, self.timeout).await
    }

    fn name(&self) -> &str {
        "model"
    }
}
