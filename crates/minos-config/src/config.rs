//! The configuration store.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ConfigError;

/// Environment-aware configuration, addressed by dotted paths.
///
/// `Config` is a cheap handle: clones share the same underlying tree, so a
/// value set through one handle is visible through all of them.
///
/// # Example
///
/// ```
/// use minos_config::Config;
/// use serde_json::json;
///
/// let config = Config::new();
/// config.load(
///     "production",
///     json!({
///         "port": 3000,
///         "api": { "ratelimit": { "production": 50, "default": 10 } },
///     }),
/// ).unwrap();
///
/// assert_eq!(config.get("api.ratelimit").unwrap(), json!(50));
/// assert!(config.get("api.missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Arc<RwLock<Map<String, Value>>>,
}

impl Config {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration holding `values` as-is.
    pub fn from_value(values: Value) -> Result<Self, ConfigError> {
        match values {
            Value::Object(map) => Ok(Self {
                values: Arc::new(RwLock::new(map)),
            }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Returns the value at a dotted path.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyPath`] for an empty path and
    /// [`ConfigError::NotFound`] when any segment is missing.
    pub fn get(&self, path: &str) -> Result<Value, ConfigError> {
        if path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let values = self.values.read();
        let mut parts = path.split('.');
        let first = parts.next().unwrap_or_default();
        let mut current = values
            .get(first)
            .ok_or_else(|| ConfigError::not_found(path))?;

        for part in parts {
            current = current
                .as_object()
                .and_then(|object| object.get(part))
                .ok_or_else(|| ConfigError::not_found(path))?;
        }

        Ok(current.clone())
    }

    /// Returns the value at a dotted path, deserialized.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.get(path)?;
        serde_json::from_value(value).map_err(|e| ConfigError::invalid_value(path, e.to_string()))
    }

    /// Returns the value at a dotted path as an unsigned integer.
    ///
    /// Numeric strings are accepted, so values coming from environment
    /// variables work the same as numbers from files.
    pub fn get_u64(&self, path: &str) -> Result<u64, ConfigError> {
        match self.get(path)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .ok_or_else(|| ConfigError::invalid_value(path, "expected a non-negative integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value(path, "expected a non-negative integer")),
            _ => Err(ConfigError::invalid_value(path, "expected a non-negative integer")),
        }
    }

    /// Sets a value, creating intermediate objects as needed.
    ///
    /// A non-object value on the way is replaced by an object.
    pub fn set(&self, path: &str, value: Value) {
        if path.is_empty() {
            return;
        }

        let mut values = self.values.write();
        let parts: Vec<&str> = path.split('.').collect();
        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current: &mut Map<String, Value> = &mut values;
        for part in parents {
            let entry = current
                .entry((*part).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => return,
            };
        }

        current.insert((*last).to_string(), value);
    }

    /// Returns a snapshot of every value.
    #[must_use]
    pub fn all(&self) -> Value {
        Value::Object(self.values.read().clone())
    }

    /// Selects values for `environment` from `raw` and merges them in.
    ///
    /// Top-level keys from `raw` replace existing keys of the same name. See
    /// [`process_configs`] for how environment-specific values are chosen.
    pub fn load(&self, environment: &str, raw: Value) -> Result<(), ConfigError> {
        let processed = match raw {
            Value::Object(map) => process_configs(environment, &map),
            _ => return Err(ConfigError::NotAnObject),
        };

        let mut values = self.values.write();
        for (key, value) in processed {
            values.insert(key, value);
        }
        Ok(())
    }

    /// Removes every value.
    pub fn clear(&self) {
        self.values.write().clear();
    }
}

/// Produces environment-specific values from a raw configuration tree.
///
/// For each key: non-object values are taken literally. An object holding a
/// key equal to `environment` yields that value; otherwise an object holding
/// `default` yields that. Any other object is processed recursively.
///
/// # Example
///
/// ```
/// use minos_config::process_configs;
/// use serde_json::json;
///
/// let raw = json!({
///     "name": "shop",
///     "db": { "host": { "development": "localhost", "default": "db.internal" } },
/// });
///
/// let dev = process_configs("development", raw.as_object().unwrap());
/// assert_eq!(dev["db"]["host"], "localhost");
///
/// let prod = process_configs("production", raw.as_object().unwrap());
/// assert_eq!(prod["db"]["host"], "db.internal");
/// ```
#[must_use]
pub fn process_configs(environment: &str, raw: &Map<String, Value>) -> Map<String, Value> {
    raw.iter()
        .map(|(key, value)| {
            let derived = match value {
                Value::Object(object) => {
                    if let Some(selected) = object.get(environment) {
                        selected.clone()
                    } else if let Some(fallback) = object.get("default") {
                        fallback.clone()
                    } else {
                        Value::Object(process_configs(environment, object))
                    }
                }
                literal => literal.clone(),
            };
            (key.clone(), derived)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(environment: &str) -> Config {
        let config = Config::new();
        config
            .load(
                environment,
                json!({
                    "port": 8080,
                    "name": "app",
                    "max_requests": { "production": 1000, "default": 0 },
                    "db": {
                        "host": { "development": "localhost", "default": "db" },
                        "pool": 5
                    }
                }),
            )
            .unwrap();
        config
    }

    #[test]
    fn test_get_scalars() {
        let config = loaded("development");

        assert_eq!(config.get("port").unwrap(), json!(8080));
        assert_eq!(config.get("name").unwrap(), json!("app"));
        assert_eq!(config.get("db.pool").unwrap(), json!(5));
    }

    #[test]
    fn test_environment_selection() {
        assert_eq!(loaded("development").get("db.host").unwrap(), json!("localhost"));
        assert_eq!(loaded("production").get("db.host").unwrap(), json!("db"));
        assert_eq!(loaded("production").get_u64("max_requests").unwrap(), 1000);
        assert_eq!(loaded("test").get_u64("max_requests").unwrap(), 0);
    }

    #[test]
    fn test_get_errors() {
        let config = loaded("development");

        assert!(matches!(config.get(""), Err(ConfigError::EmptyPath)));
        assert!(matches!(
            config.get("db.missing"),
            Err(ConfigError::NotFound { ref path }) if path == "db.missing"
        ));
        assert!(config.get("port.nested").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let config = Config::new();
        config.set("api.ratelimit.max", json!(10));

        assert_eq!(config.get("api.ratelimit.max").unwrap(), json!(10));
        assert!(config.get("api.ratelimit").unwrap().is_object());
    }

    #[test]
    fn test_set_replaces_scalar_parent() {
        let config = Config::new();
        config.set("api", json!(1));
        config.set("api.key", json!("x"));

        assert_eq!(config.get("api.key").unwrap(), json!("x"));
    }

    #[test]
    fn test_clones_share_values() {
        let config = Config::new();
        let other = config.clone();
        other.set("port", json!(9000));

        assert_eq!(config.get_u64("port").unwrap(), 9000);
    }

    #[test]
    fn test_get_u64_accepts_strings() {
        let config = Config::new();
        config.set("max_requests", json!("250"));
        assert_eq!(config.get_u64("max_requests").unwrap(), 250);

        config.set("max_requests", json!("many"));
        assert!(matches!(
            config.get_u64("max_requests"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_merges_top_level_keys() {
        let config = loaded("development");
        config.load("development", json!({ "port": 3000 })).unwrap();

        assert_eq!(config.get_u64("port").unwrap(), 3000);
        assert_eq!(config.get("name").unwrap(), json!("app"));
    }

    #[test]
    fn test_load_rejects_non_object() {
        let config = Config::new();
        assert!(matches!(
            config.load("development", json!([1, 2])),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn test_get_as() {
        #[derive(serde::Deserialize)]
        struct Db {
            host: String,
            pool: u32,
        }

        let db: Db = loaded("development").get_as("db").unwrap();
        assert_eq!(db.host, "localhost");
        assert_eq!(db.pool, 5);
    }

    #[test]
    fn test_booleans_are_literal() {
        let raw = json!({ "debug": true, "tags": ["a"] });
        let processed = process_configs("development", raw.as_object().unwrap());

        assert_eq!(processed["debug"], json!(true));
        assert_eq!(processed["tags"], json!(["a"]));
    }
}
