use thiserror::Error;

/// Result type used across the rulegen core crate.
pub type Result<T> = std::result::Result<T, RulegenError>;

/// Canonical error representation shared by the workspace crates.
#[derive(Debug, Error)]
pub enum RulegenError {
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

impl From<serde_json::Error> for RulegenError {
    fn from(err: serde_json::Error) -> Self {
        RulegenError::SerializationError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for environment variable {key}: {reason}")]
    InvalidEnvVar {
        key: String,
        value: String,
        reason: String,
    },
}

impl From<ConfigError> for RulegenError {
    fn from(value: ConfigError) -> Self {
        RulegenError::ConfigError(value.to_string())
    }
}
