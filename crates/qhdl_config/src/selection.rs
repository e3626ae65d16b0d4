//! Which architecture of an entity to elaborate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Architecture choice for entities that may have several bodies.
///
/// Written in configuration as `"only"` or `"named:<architecture>"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArchitectureSelection {
    /// The entity must have exactly one architecture.
    #[default]
    Only,
    /// Use the architecture with this name (compared case-insensitively).
    ///
    /// Entities with a single architecture use it even when the name differs;
    /// entities with several must have one of this name.
    Named(String),
}

impl ArchitectureSelection {
    /// The requested architecture name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            ArchitectureSelection::Only => None,
            ArchitectureSelection::Named(name) => Some(name),
        }
    }
}

impl FromStr for ArchitectureSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("only") {
            return Ok(ArchitectureSelection::Only);
        }
        match s.split_once(':') {
            Some((tag, name)) if tag.trim().eq_ignore_ascii_case("named") => {
                let name = name.trim();
                if name.is_empty() {
                    Err(ConfigError::ValidationError(
                        "architecture selection `named:` needs a name".to_string(),
                    ))
                } else {
                    Ok(ArchitectureSelection::Named(name.to_string()))
                }
            }
            _ => Err(ConfigError::ValidationError(format!(
                "invalid architecture selection `{s}`, expected `only` or `named:<name>`"
            ))),
        }
    }
}

impl TryFrom<String> for ArchitectureSelection {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArchitectureSelection> for String {
    fn from(value: ArchitectureSelection) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ArchitectureSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureSelection::Only => f.write_str("only"),
            ArchitectureSelection::Named(name) => write!(f, "named:{name}"),
        }
    }
}
