use std::process::ExitCode;

use iq_core::query::Query;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::QueryArgs;
use crate::output::output;

/// Handle `iq validate`.
pub async fn handle(args: &QueryArgs, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let query = Query::parse(&args.query)?;
    let config = bootstrap::load_config(flags)?;
    let pipeline = bootstrap::build_pipeline(&config).await;

    let verdict = pipeline.validate(&query).await?;
    output(&verdict, flags.format)?;

    Ok(if verdict.is_accepted() {
        ExitCode::SUCCESS
    } else {
        super::rejected()
    })
}
