//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "zsv.toml";

/// Loads `<project_dir>/zsv.toml`, falling back to defaults when it is absent.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates an explicit configuration file.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `zsv.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.generator.output_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "generator.output_dir is empty".to_string(),
        ));
    }
    for code in &config.diagnostics.allow {
        if !is_warning_code(code) {
            return Err(ConfigError::ValidationError(format!(
                "diagnostics.allow entry '{code}' is not a warning code like W305"
            )));
        }
    }
    Ok(())
}

fn is_warning_code(code: &str) -> bool {
    let mut chars = code.chars();
    chars.next() == Some('W') && code.len() == 4 && chars.all(|c| c.is_ascii_digit())
}
