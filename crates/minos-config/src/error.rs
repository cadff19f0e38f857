//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `get` was called with an empty path.
    #[error("you must supply a config path")]
    EmptyPath,

    /// No value exists at the requested path.
    #[error("no config value found for: {path}")]
    NotFound {
        /// The dotted path that was requested.
        path: String,
    },

    /// A value exists but has the wrong shape for the requested type.
    #[error("invalid configuration value for {path}: {reason}")]
    InvalidValue {
        /// The dotted path of the value.
        path: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported file or string format.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// The configuration root is not an object.
    #[error("configuration root must be an object")]
    NotAnObject,

    /// Loading a `.env` file failed.
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl ConfigError {
    /// Create a new not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when the error means "no value at this path".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ConfigError::not_found("api.ratelimit");
        assert_eq!(err.to_string(), "no config value found for: api.ratelimit");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_path_error() {
        assert_eq!(
            ConfigError::EmptyPath.to_string(),
            "you must supply a config path"
        );
        assert!(!ConfigError::EmptyPath.is_not_found());
    }

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("/path/to/app.json");
        assert!(err.to_string().contains("/path/to/app.json"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("max_requests", "expected integer");
        assert!(err.to_string().contains("max_requests"));
        assert!(err.to_string().contains("expected integer"));
    }
}
