//! Domain error types

use thiserror::Error;

/// Error when an incoming request cannot be turned into a typed value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Invalid timestamp \"{input}\": {reason}")]
    InvalidTimestamp { input: String, reason: String },
}

impl RequestError {
    /// Shorthand for a malformed request with a formatted reason
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }

    /// Shorthand for an unparseable scheduled time or zone
    pub fn invalid_timestamp(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Error when parsing an OS version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid OS version: \"{input}\". Expected format: <major>[.<minor>[.<patch>]] (e.g., 10.13, 14.2.1)"
)]
pub struct OsVersionParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
