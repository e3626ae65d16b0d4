//! Loading and validation of `qhdl.toml` and the elaboration options it carries.
//!
//! [`ElaborationOptions`] can also be built directly in code; its
//! [`Default`] matches an empty `[elaborate]` table.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod selection;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use selection::ArchitectureSelection;
pub use types::*;
