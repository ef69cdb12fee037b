use anyhow::Context;
use iq_config::IqConfig;
use iq_pipeline::{Pipeline, PipelineBuilder};

use crate::cli::GlobalFlags;

/// Load `.env`, then layered config with `--config` above the discovered files.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<IqConfig> {
    load_dotenv()?;
    let config = IqConfig::load_from(flags.config.as_deref()).with_context(|| {
        match &flags.config {
            Some(path) => format!("failed to load config (with {})", path.display()),
            None => "failed to load config".to_string(),
        }
    })?;
    warn_unconfigured(&config);
    Ok(config)
}

/// Build the pipeline described by `config`. Never fails: problems show up
/// in `iq status`.
pub async fn build_pipeline(config: &IqConfig) -> Pipeline {
    PipelineBuilder::from_config(config).build().await
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn warn_unconfigured(config: &IqConfig) {
    for warning in unconfigured_warnings(config) {
        tracing::warn!("{warning}");
    }
    if config.catalog.uses_sample_catalog() {
        tracing::info!("catalog.catalog_path not set, serving the sample catalog");
    }
}

fn unconfigured_warnings(config: &IqConfig) -> Vec<&'static str> {
    if config.gemini.is_configured() {
        return Vec::new();
    }
    let mut warnings =
        vec!["gemini is not configured; set IQ_GEMINI__API_KEY to enable intent extraction"];
    if config.needs_gemini() {
        warnings.push(
            "gemini-backed embeddings or validation are selected without an api key; \
             the pipeline will run degraded",
        );
    }
    warnings
}
