use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, bail};
use iq_schema::{SchemaError, SchemaRegistry, Violation};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SchemaCommands;
use crate::output::output;

/// Outcome of `iq schema check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub file: String,
    /// Registered schema checked against; `None` for the intent contract.
    pub schema: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Handle `iq schema`. Needs no config or pipeline.
pub fn handle(action: &SchemaCommands, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let registry = SchemaRegistry::new();
    match action {
        SchemaCommands::Export { name } => {
            output(&export(&registry, name.as_deref())?, flags.format)?;
            Ok(ExitCode::SUCCESS)
        }
        SchemaCommands::Check(args) => {
            let report = match &args.schema {
                Some(name) => check_file_against(&registry, name, &args.file)?,
                None => check_file(&args.file)?,
            };
            output(&report, flags.format)?;
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                super::rejected()
            })
        }
    }
}

/// One schema, or all of them keyed by name.
pub fn export(registry: &SchemaRegistry, name: Option<&str>) -> anyhow::Result<Value> {
    match name {
        Some(name) => match registry.get(name) {
            Some(schema) => Ok(schema.clone()),
            None => bail!(
                "unknown schema '{name}' (available: {})",
                registry.list().join(", ")
            ),
        },
        None => {
            let mut all = Map::new();
            for name in registry.list() {
                if let Some(schema) = registry.get(name) {
                    all.insert(name.to_string(), schema.clone());
                }
            }
            Ok(Value::Object(all))
        }
    }
}

/// Read an intent document and run it through the intent shape contract.
pub fn check_file(path: &Path) -> anyhow::Result<CheckReport> {
    let document = read_json(path)?;
    let report = iq_schema::validate_candidate(&document);
    Ok(CheckReport {
        file: path.display().to_string(),
        schema: None,
        valid: report.is_valid(),
        violations: report.violations,
        errors: Vec::new(),
    })
}

/// Read a JSON document and validate it against a registered schema.
pub fn check_file_against(
    registry: &SchemaRegistry,
    name: &str,
    path: &Path,
) -> anyhow::Result<CheckReport> {
    let document = read_json(path)?;
    let errors = match registry.validate(name, &document) {
        Ok(()) => Vec::new(),
        Err(SchemaError::ValidationFailed { errors }) => errors,
        Err(other) => return Err(other.into()),
    };
    Ok(CheckReport {
        file: path.display().to_string(),
        schema: Some(name.to_string()),
        valid: errors.is_empty(),
        violations: Vec::new(),
        errors,
    })
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}
