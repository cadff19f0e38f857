//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: files, strings and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{Config, ConfigError};

/// Configuration loader with layered approach.
///
/// Layers are applied in order, with later layers overriding earlier ones.
/// File and string layers are merged deeply into a raw tree which is then
/// processed for the selected environment. Environment variables are applied
/// last, directly to the processed values.
///
/// # Example
///
/// ```no_run
/// use minos_config::ConfigLoader;
///
/// # fn main() -> Result<(), minos_config::ConfigError> {
/// let config = ConfigLoader::new("production")
///     .with_optional_file("config/app.json")?
///     .with_env_prefix("MINOS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    environment: String,
    raw: Map<String, Value>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a loader selecting values for `environment`.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            raw: Map::new(),
            env_prefix: None,
        }
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats.
    /// The file format is determined by the file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.with_string(&content, &format)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use minos_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     port = 3000
    ///
    ///     [max_requests]
    ///     production = 500
    ///     default = 0
    /// "#;
    ///
    /// let config = ConfigLoader::new("production")
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.get_u64("port").unwrap(), 3000);
    /// assert_eq!(config.get_u64("max_requests").unwrap(), 500);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let value: Value = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        match value {
            Value::Object(map) => merge_deep(&mut self.raw, map),
            _ => return Err(ConfigError::NotAnObject),
        }

        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, mapped to
    /// the lowercase dotted path `section.key`. Values that parse as JSON are
    /// stored as such, anything else as a string:
    /// - `MINOS__PORT=9000` sets `port` to the number `9000`
    /// - `MINOS__DB__HOST=db.internal` sets `db.host` to a string
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file for environment variables.
    ///
    /// A missing file is not an error.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e.to_string())),
        }
    }

    /// Finalize and return the loaded configuration.
    pub fn load(self) -> Result<Config, ConfigError> {
        let config = Config::new();
        config.load(&self.environment, Value::Object(self.raw))?;

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&config, &prefix, env::vars());
        }

        Ok(config)
    }
}

fn merge_deep(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_deep(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

fn apply_env_overrides<I>(config: &Config, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let marker = format!("{prefix}__");

    for (key, raw) in vars {
        let Some(rest) = key.strip_prefix(&marker) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let path = rest
            .split("__")
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(".");
        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));

        tracing::debug!(path = %path, "configuration override from environment");
        config.set(&path, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"port": {{"development": 3000, "default": 80}}}}"#).unwrap();

        let config = ConfigLoader::new("development")
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.get_u64("port").unwrap(), 3000);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new("development")
            .with_file("/nonexistent/app.json")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        assert!(ConfigLoader::new("development")
            .with_optional_file("/nonexistent/app.json")
            .is_ok());
    }

    #[test]
    fn test_unsupported_format() {
        let err = ConfigLoader::new("development")
            .with_string("a: 1", "yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_layers_merge_deeply() {
        let config = ConfigLoader::new("production")
            .with_string(r#"{"db": {"host": "a", "pool": 5}}"#, "json")
            .unwrap()
            .with_string("[db]\nhost = \"b\"\n", "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.get("db.host").unwrap(), json!("b"));
        assert_eq!(config.get_u64("db.pool").unwrap(), 5);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::new();
        config.set("db.host", json!("localhost"));

        apply_env_overrides(
            &config,
            "MINOS",
            vec![
                ("MINOS__PORT".to_string(), "9000".to_string()),
                ("MINOS__DB__HOST".to_string(), "db.internal".to_string()),
                ("OTHER__PORT".to_string(), "1".to_string()),
                ("MINOS_ENV".to_string(), "production".to_string()),
            ],
        );

        assert_eq!(config.get("port").unwrap(), json!(9000));
        assert_eq!(config.get("db.host").unwrap(), json!("db.internal"));
    }
}
