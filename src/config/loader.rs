//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.base_url`.
pub const API_BASE_ENV: &str = "AUTOCOMPLY_API_BASE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MonitorConfig, ConfigError> {
    let config: MonitorConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: file (or defaults), environment, then
/// `overrides` from the command line. Validated once, after every layer.
pub fn resolve_config<F>(path: Option<&Path>, overrides: F) -> Result<MonitorConfig, ConfigError>
where
    F: FnOnce(&mut MonitorConfig),
{
    resolve_with(path, |key| std::env::var(key).ok(), overrides)
}

fn resolve_with<L, F>(path: Option<&Path>, lookup: L, overrides: F) -> Result<MonitorConfig, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    F: FnOnce(&mut MonitorConfig),
{
    let mut config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => MonitorConfig::default(),
    };
    apply_env_overrides(&mut config, lookup);
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = lookup(API_BASE_ENV) {
        tracing::debug!(base = %base, "API base overridden from environment");
        config.api.base_url = base.trim_end_matches('/').to_string();
    }
}
