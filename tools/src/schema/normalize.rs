//! Document normalization: YAML on disk → JSON value
//!
//! YAML parses into types a JSON schema engine cannot consume directly
//! (tagged values, non-string mapping keys). `serde_json` would quietly turn
//! scalar keys such as `1` or `true` into strings, so mapping keys are checked
//! before conversion: any key that is not a YAML string is a `Shape` error.

use super::error::{Result, SchemaError};
use std::path::Path;

/// Read and normalize the YAML document at `path`
///
/// # Errors
///
/// - `FileNotFound` if the file cannot be read
/// - `Syntax` if the bytes are not valid YAML
/// - `Shape` if the YAML tree cannot be expressed as JSON
pub async fn normalize_file(path: &Path) -> Result<serde_json::Value> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SchemaError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    normalize_bytes(&bytes)
}

/// Normalize YAML bytes already in memory
///
/// # Errors
///
/// - `Syntax` if the bytes are not valid YAML
/// - `Shape` if the YAML tree cannot be expressed as JSON
pub fn normalize_bytes(bytes: &[u8]) -> Result<serde_json::Value> {
    let tree: serde_yaml::Value =
        serde_yaml::from_slice(bytes).map_err(|e| SchemaError::Syntax(e.to_string()))?;

    check_keys(&tree, "")?;
    serde_json::to_value(&tree).map_err(|e| SchemaError::Shape(e.to_string()))
}

/// Reject mapping keys that are not strings, reporting the enclosing path
fn check_keys(value: &serde_yaml::Value, at: &str) -> Result<()> {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, child) in map {
                let serde_yaml::Value::String(name) = key else {
                    return Err(SchemaError::Shape(format!(
                        "mapping key {} at '{at}' is not a string",
                        describe_key(key)
                    )));
                };
                check_keys(child, &format!("{at}/{name}"))?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_keys(item, &format!("{at}/{i}"))),
        serde_yaml::Value::Tagged(tagged) => check_keys(&tagged.value, at),
        _ => Ok(()),
    }
}

fn describe_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => format!("`{b}` (boolean)"),
        serde_yaml::Value::Number(n) => format!("`{n}` (number)"),
        serde_yaml::Value::Sequence(_) => "of type sequence".to_string(),
        serde_yaml::Value::Mapping(_) => "of type mapping".to_string(),
        serde_yaml::Value::Tagged(tagged) => format!("tagged {}", tagged.tag),
        serde_yaml::Value::String(s) => format!("`{s}`"),
    }
}
