//! # iq-config
//!
//! Layered configuration loading for IntelliQuery using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`IQ_*` prefix, `__` as separator)
//! 2. An explicit config file passed by the caller (`iq --config <path>`)
//! 3. Project-level `.intelliquery/config.toml`
//! 4. User-level `~/.config/intelliquery/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `IQ_GEMINI__API_KEY` -> `gemini.api_key`,
//! `IQ_CATALOG__TOP_K` -> `catalog.top_k`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use iq_config::IqConfig;
//!
//! let config = IqConfig::load().expect("config");
//! if config.gemini.is_configured() {
//!     println!("model: {}", config.gemini.model);
//! }
//! ```

mod catalog;
mod embeddings;
mod error;
mod gemini;
mod validation;

pub use catalog::CatalogConfig;
pub use embeddings::{EmbeddingProviderKind, EmbeddingsConfig};
pub use error::ConfigError;
pub use gemini::{DEFAULT_SERVICE_TIMEOUT, DEFAULT_TIMEOUT_SECS, GeminiConfig};
pub use validation::{CheckerKind, ValidationConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IqConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl IqConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// `.env` files are not read here; the binary loads them before calling
    /// this.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to extract and
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering `extra` (if any) above the discovered
    /// TOML files and below environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when `extra` does not exist, and
    /// extraction or validation errors otherwise.
    pub fn load_from(extra: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = extra
            && !path.exists()
        {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let config: Self = Self::figment(extra).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".intelliquery/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("IQ_").split("__"));

        figment
    }

    /// Reject values that would make the pipeline misbehave at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.top_k == 0 {
            return Err(invalid("catalog.top_k", "must be at least 1"));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(invalid("gemini.timeout_secs", "must be at least 1"));
        }
        if self.embeddings.dimension == 0 {
            return Err(invalid("embeddings.dimension", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.validation.min_recognized_ratio) {
            return Err(invalid(
                "validation.min_recognized_ratio",
                "must be within [0.0, 1.0]",
            ));
        }
        Ok(())
    }

    /// Whether any configured collaborator talks to the Gemini API.
    #[must_use]
    pub fn needs_gemini(&self) -> bool {
        self.embeddings.provider == EmbeddingProviderKind::Gemini || self.validation.uses_model()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("intelliquery").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
