//! `app_name`: the configured application name.

use serde_json::{Map, Value};

/// Reads `config.name`, defaulting to `Minos`.
pub fn app_name(values: &Map<String, Value>) -> Value {
    values
        .get("config")
        .and_then(|config| config.get("name"))
        .cloned()
        .unwrap_or_else(|| Value::String("Minos".to_string()))
}
