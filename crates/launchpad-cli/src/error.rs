//! Error types for the launchpad operator CLI

use launchpad_core::FactoryError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {field} = {value} (expected {expected})")]
    InvalidConfig {
        field: String,
        value: String,
        expected: String,
    },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("State snapshot at {0} belongs to a different factory")]
    SnapshotMismatch(String),

    #[error(transparent)]
    Factory(#[from] FactoryError),
}

impl CliError {
    pub fn invalid_config(field: &str, value: impl ToString, expected: &str) -> Self {
        CliError::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        CliError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}
