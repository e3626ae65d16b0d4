//! Reading `qhdl.toml` from disk or from a string.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::ProjectConfig;

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "qhdl.toml";

/// Loads and validates `<project_dir>/qhdl.toml`.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates configuration text.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.trim().is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if config.project.sources.iter().any(|s| s.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "project.sources contains an empty path".to_string(),
        ));
    }
    if config.elaborate.max_expansion_depth == 0 {
        return Err(ConfigError::ValidationError(
            "elaborate.max_expansion_depth must be at least 1".to_string(),
        ));
    }
    Ok(())
}
