//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use iq_config::{CheckerKind, ConfigError, EmbeddingProviderKind, IqConfig};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn loads_gemini_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[gemini]
api_key = "AIza-toml"
model = "gemini-1.5-pro"
embedding_model = "text-embedding-005"
timeout_secs = 8
"#,
        )?;

        let config: IqConfig = Figment::from(Serialized::defaults(IqConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.gemini.api_key, "AIza-toml");
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.embedding_model, "text-embedding-005");
        assert_eq!(config.gemini.timeout_secs, 8);
        assert!(config.gemini.is_configured());
        Ok(())
    });
}

#[test]
fn loads_catalog_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[catalog]
catalog_path = "data/workspaces.jsonl"
index_path = "data/index.jsonl"
top_k = 3
"#,
        )?;

        let config: IqConfig = Figment::from(Serialized::defaults(IqConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.catalog.catalog_path,
            Some(PathBuf::from("data/workspaces.jsonl"))
        );
        assert_eq!(config.catalog.index_path, Some(PathBuf::from("data/index.jsonl")));
        assert_eq!(config.catalog.top_k, 3);
        assert!(!config.catalog.uses_sample_catalog());
        Ok(())
    });
}

#[test]
fn loads_checker_selection_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[validation]
coherence = "heuristic"
completeness = "model"
min_recognized_ratio = 0.6

[embeddings]
provider = "gemini"
"#,
        )?;

        let config: IqConfig = Figment::from(Serialized::defaults(IqConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.validation.coherence, CheckerKind::Heuristic);
        assert_eq!(config.validation.completeness, CheckerKind::Model);
        assert_eq!(config.embeddings.provider, EmbeddingProviderKind::Gemini);
        assert!(config.needs_gemini());
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[gemini]
api_key = "from-toml"
"#,
        )?;
        jail.set_env("IQ_GEMINI__API_KEY", "from-env");

        let config: IqConfig = Figment::from(Serialized::defaults(IqConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("IQ_").split("__"))
            .extract()?;

        assert_eq!(config.gemini.api_key, "from-env");
        Ok(())
    });
}

#[test]
fn explicit_file_is_layered_by_load_from() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[catalog]
top_k = 7
"#,
        )?;

        let config = IqConfig::load_from(Some("custom.toml".as_ref())).expect("config loads");
        assert_eq!(config.catalog.top_k, 7);
        Ok(())
    });
}

#[test]
fn project_local_file_is_discovered() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".intelliquery"))
            .expect("create config dir");
        jail.create_file(
            ".intelliquery/config.toml",
            r#"
[embeddings]
dimension = 128
"#,
        )?;

        let config = IqConfig::load().expect("config loads");
        assert_eq!(config.embeddings.dimension, 128);
        Ok(())
    });
}

#[test]
fn load_rejects_invalid_values() {
    Jail::expect_with(|jail| {
        jail.set_env("IQ_CATALOG__TOP_K", "0");

        let err = IqConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
