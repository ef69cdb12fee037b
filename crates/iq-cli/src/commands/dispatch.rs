use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, flags).await,
        Commands::Intent(args) => commands::intent::handle(&args, flags).await,
        Commands::Status => commands::status::handle(flags).await,
        Commands::Schema { action } => commands::schema::handle(&action, flags),
        Commands::Index { action } => commands::index::handle(&action, flags).await,
    }
}
