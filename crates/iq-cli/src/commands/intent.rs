use std::process::ExitCode;

use anyhow::Context;
use iq_core::intent::IntentCandidate;
use iq_core::query::Query;
use iq_core::responses::{PipelineMetadata, PipelineResult};
use iq_core::verdict::ValidationVerdict;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::IntentArgs;
use crate::output::output;

/// Whether the intent can be actioned or the query must be rephrased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Ok,
    ClarificationNeeded,
}

/// JSON printed by `iq intent`.
#[derive(Debug, Serialize)]
pub struct IntentResponse<'a> {
    pub status: IntentStatus,
    pub query: &'a Query,
    pub validation: &'a ValidationVerdict,
    pub intent: Option<&'a IntentCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a PipelineMetadata>,
}

impl<'a> IntentResponse<'a> {
    #[must_use]
    pub fn new(result: &'a PipelineResult, with_metadata: bool) -> Self {
        let status = if result.needs_clarification() {
            IntentStatus::ClarificationNeeded
        } else {
            IntentStatus::Ok
        };
        Self {
            status,
            query: &result.query,
            validation: &result.validation,
            intent: result.intent.as_ref(),
            metadata: with_metadata.then_some(&result.metadata),
        }
    }
}

/// Handle `iq intent`.
pub async fn handle(args: &IntentArgs, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let query = Query::parse(&args.query)?;
    let config = bootstrap::load_config(flags)?;
    let pipeline = bootstrap::build_pipeline(&config).await;

    let result = match pipeline.process(&query).await {
        Ok(result) => result,
        Err(error) => {
            let hint = if error.is_retryable() {
                match error.retry_after_secs() {
                    Some(secs) => format!(" (retry after {secs}s)"),
                    None => " (retryable)".to_string(),
                }
            } else {
                String::new()
            };
            return Err(error).context(format!("intent extraction failed{hint}"));
        }
    };

    output(&IntentResponse::new(&result, !args.no_metadata), flags.format)?;
    Ok(ExitCode::SUCCESS)
}
