//! Errors raised while reading `qhdl.toml`.

/// Failure to read, parse or validate a project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The text is not valid TOML or does not match the expected layout.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value is outside its allowed range.
    #[error("validation error: {0}")]
    ValidationError(String),
}
