//! Environment variable handling.
//!
//! Every step runs with one shared environment: the process environment
//! overlaid with the config file's `env` mapping. Config keys are upper-cased
//! and take precedence.

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Load environment variables from system.
pub fn load_system_env() -> Vec<(String, String)> {
    std::env::vars().collect()
}

/// Convert the config `env` mapping into upper-cased key/value pairs.
///
/// Scalar values are stringified; sequences and mappings are skipped with
/// a warning.
pub fn config_env(env: &Mapping) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();

    for (key, value) in env {
        let Some(key) = scalar_to_string(key) else {
            tracing::warn!("Ignoring env entry with non-scalar key {:?}", key);
            continue;
        };
        let Some(value) = scalar_to_string(value) else {
            tracing::warn!("Ignoring env entry '{}': value is not a scalar", key);
            continue;
        };
        result.insert(key.to_uppercase(), value);
    }

    result
}

/// Merge the config `env` mapping over the process environment.
///
/// Returns `KEY=VALUE` entries sorted by key.
pub fn merge_env(
    env: &Mapping,
    process_env: impl IntoIterator<Item = (String, String)>,
) -> Vec<String> {
    let mut merged: BTreeMap<String, String> = process_env.into_iter().collect();
    merged.extend(config_env(env));
    merged
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
