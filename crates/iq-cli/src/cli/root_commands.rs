use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{IndexCommands, SchemaCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the validation gate only.
    Validate(QueryArgs),
    /// Run the whole pipeline and print the structured intent.
    Intent(IntentArgs),
    /// Catalog, index and collaborator status.
    Status,
    /// JSON Schemas of the pipeline's documents.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// Similarity index maintenance.
    Index {
        #[command(subcommand)]
        action: IndexCommands,
    },
}

/// Arguments for `iq validate`.
#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    /// Natural-language query.
    pub query: String,
}

/// Arguments for `iq intent`.
#[derive(Clone, Debug, Args)]
pub struct IntentArgs {
    /// Natural-language query.
    pub query: String,
    /// Omit timing and retrieval details from the output.
    #[arg(long)]
    pub no_metadata: bool,
}

/// Arguments for `iq schema check`.
#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// JSON file to check.
    pub file: PathBuf,
    /// Check against this registered schema instead of the intent contract.
    #[arg(long)]
    pub schema: Option<String>,
}
