//! Configuration document loading
//!
//! Reads a configuration file, digests the raw bytes for provenance, and
//! normalizes the parsed document into the JSON value model the merge
//! engine operates on. The format is chosen by file extension.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Loader errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Reads a configuration file and returns its tree plus the hex SHA-256
/// digest of the raw bytes.
///
/// `.yaml`/`.yml` files parse as YAML, `.toml` files as TOML; anything
/// else is [`LoadError::UnsupportedFormat`].
pub fn load_config_file(path: &Path) -> Result<(Value, String), LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::Io(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| LoadError::Parse(format!("invalid UTF-8: {}", e)))?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value = match extension {
        "yaml" | "yml" => {
            let doc: serde_yaml::Value = serde_yaml::from_str(&contents)
                .map_err(|e| LoadError::Parse(format!("YAML parse error: {}", e)))?;
            yaml_to_value(doc)?
        }
        "toml" => {
            let doc: toml::Value = toml::from_str(&contents)
                .map_err(|e| LoadError::Parse(format!("TOML parse error: {}", e)))?;
            toml_to_value(doc)
        }
        _ => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
    };

    Ok((value, digest))
}

/// Converts a YAML document into the engine's value model.
///
/// Non-string scalar mapping keys are stringified; structured keys are a
/// parse error. Tagged values unwrap to their inner value.
pub fn yaml_to_value(doc: serde_yaml::Value) -> Result<Value, LoadError> {
    Ok(match doc {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_value)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                out.insert(yaml_key(key)?, yaml_to_value(value)?);
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value)?,
    })
}

fn yaml_number(n: serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        // Non-finite floats have no JSON representation.
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, LoadError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(LoadError::Parse(format!(
            "unsupported mapping key: {:?}",
            other
        ))),
    }
}

/// Converts a TOML document into the engine's value model.
///
/// Datetimes stringify; floats without a JSON representation become null.
pub fn toml_to_value(doc: toml::Value) -> Value {
    match doc {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            Value::Array(items.into_iter().map(toml_to_value).collect())
        }
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_value(value)))
                .collect(),
        ),
    }
}
