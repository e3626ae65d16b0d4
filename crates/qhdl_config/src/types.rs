//! Configuration types deserialized from `qhdl.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::selection::ArchitectureSelection;

/// The whole `qhdl.toml` file.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// The `[project]` table.
    pub project: ProjectMeta,
    /// The `[elaborate]` table; every field has a default.
    #[serde(default)]
    pub elaborate: ElaborationOptions,
}

/// Project identity and inputs.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// Project name.
    pub name: String,
    /// Name of the top-level entity.
    pub top: String,
    /// Design files relative to the project directory.
    ///
    /// Either a single path or a list of paths.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
}

/// Knobs that change how a design is flattened and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElaborationOptions {
    /// Which architecture to use for entities with several.
    pub architecture: ArchitectureSelection,
    /// Permit more than one driver on a net.
    pub allow_multi_driver: bool,
    /// How unconnected ports and undriven nets are reported.
    pub unconnected_port_severity: PortSeverity,
    /// Maximum instance nesting below the top entity.
    pub max_expansion_depth: u32,
    /// Permit cycles between leaf instances.
    pub allow_feedback: bool,
}

impl Default for ElaborationOptions {
    fn default() -> Self {
        Self {
            architecture: ArchitectureSelection::Only,
            allow_multi_driver: false,
            unconnected_port_severity: PortSeverity::Error,
            max_expansion_depth: 64,
            allow_feedback: true,
        }
    }
}

/// Severity used for connectivity gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSeverity {
    /// Fail elaboration.
    #[default]
    Error,
    /// Report and continue.
    Warning,
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a path or a list of paths")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut paths = Vec::new();
            while let Some(path) = seq.next_element::<String>()? {
                paths.push(path);
            }
            Ok(paths)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ElaborationOptions::default();
        assert_eq!(opts.architecture, ArchitectureSelection::Only);
        assert!(!opts.allow_multi_driver);
        assert_eq!(opts.unconnected_port_severity, PortSeverity::Error);
        assert_eq!(opts.max_expansion_depth, 64);
        assert!(opts.allow_feedback);
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let opts: ElaborationOptions =
            toml::from_str("unconnected_port_severity = \"warning\"").unwrap();
        assert_eq!(opts.unconnected_port_severity, PortSeverity::Warning);
        assert_eq!(opts.max_expansion_depth, 64);
    }

    #[test]
    fn unknown_option_rejected() {
        assert!(toml::from_str::<ElaborationOptions>("allow_loops = true").is_err());
    }
}
