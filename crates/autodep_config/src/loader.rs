//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "autodep.toml";

/// Loads and validates an `autodep.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file under any name.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates an `autodep.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and the shape of the discovery tables.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }

    for (header, candidates) in &config.autodep.header_suffixes {
        for suffix in std::iter::once(header).chain(candidates) {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(ConfigError::InvalidSuffix(suffix.clone()));
            }
        }
    }

    for pattern in &config.autodep.shallow_scan {
        regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
    }

    for prefix in config.autodep.uselib.keys() {
        if prefix.is_empty() || prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(ConfigError::InvalidPrefix(prefix.clone()));
        }
    }

    for (name, target) in &config.targets {
        if target.sources.is_empty() {
            return Err(ConfigError::MissingField(format!("targets.{name}.sources")));
        }
    }
    Ok(())
}
