use std::process::ExitCode;

use anyhow::{Context, bail};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::IndexCommands;
use crate::output::output;

#[derive(Debug, Serialize)]
struct IndexSummary {
    path: String,
    rows: usize,
    dimension: Option<usize>,
}

/// Handle `iq index`.
pub async fn handle(action: &IndexCommands, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    match action {
        IndexCommands::Build { out } => {
            let config = bootstrap::load_config(flags)?;
            let pipeline = bootstrap::build_pipeline(&config).await;
            let snapshot = pipeline.snapshot();
            if snapshot.index.is_empty() {
                let reason = pipeline
                    .status()
                    .last_error
                    .unwrap_or_else(|| "catalog is empty".to_string());
                bail!("nothing to index: {reason}");
            }

            snapshot
                .index
                .write_jsonl(out)
                .with_context(|| format!("failed to write index to {}", out.display()))?;
            tracing::info!(path = %out.display(), rows = snapshot.index.len(), "index written");

            output(
                &IndexSummary {
                    path: out.display().to_string(),
                    rows: snapshot.index.len(),
                    dimension: snapshot.index.dimension(),
                },
                flags.format,
            )?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
