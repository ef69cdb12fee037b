//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be parsed or a value has the wrong type.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// The file passed with `--config` does not exist.
    #[error("Config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A value parsed but is outside what the pipeline accepts.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
