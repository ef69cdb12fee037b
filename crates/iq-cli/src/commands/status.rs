use std::process::ExitCode;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `iq status`.
pub async fn handle(flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let config = bootstrap::load_config(flags)?;
    let pipeline = bootstrap::build_pipeline(&config).await;
    output(&pipeline.status(), flags.format)?;
    Ok(ExitCode::SUCCESS)
}
