use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::root_commands::CheckArgs;

/// `iq schema` actions.
#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// Print one schema by name, or every schema keyed by name.
    Export {
        /// Schema name, e.g. `intent_candidate`.
        name: Option<String>,
    },
    /// Validate an intent document against the intent shape contract.
    Check(CheckArgs),
}

/// `iq index` actions.
#[derive(Clone, Debug, Subcommand)]
pub enum IndexCommands {
    /// Embed the configured catalog and write the index as JSONL.
    Build {
        /// Output path.
        out: PathBuf,
    },
}
