//! Layered configuration stacks with provenance
//!
//! A stack collects configuration layers in precedence order (first pushed
//! is the lowest) and folds them into a single tree with the merge engine,
//! recording where each layer came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::loader::{load_config_file, LoadError};
use crate::merge::{yaml_merge_with, MergeError, MergeStrategy};

/// A contributing configuration layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSource {
    /// Human-readable label (the file name for file layers)
    pub label: String,

    /// File path (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory layers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug)]
struct Layer {
    value: Value,
    source: LayerSource,
}

/// Ordered collection of configuration layers awaiting a merge
#[derive(Debug, Default)]
pub struct ConfigStack {
    layers: Vec<Layer>,
}

/// Stack errors
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl ConfigStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an in-memory layer (built-in defaults, programmatic overrides).
    pub fn push_value(&mut self, label: impl Into<String>, value: Value) {
        self.layers.push(Layer {
            value,
            source: LayerSource {
                label: label.into(),
                path: None,
                digest: None,
            },
        });
    }

    /// Loads a file layer, recording its path and content digest.
    pub fn push_file(&mut self, path: &Path) -> Result<(), StackError> {
        let (value, digest) = load_config_file(path)?;
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.layers.push(Layer {
            value,
            source: LayerSource {
                label,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            },
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Merges all layers under the default strategy.
    pub fn merge(self) -> Result<MergedConfig, StackError> {
        self.merge_with(MergeStrategy::default())
    }

    /// Merges all layers, each starting from `default`.
    ///
    /// Individual layers may still override the strategy with their own
    /// control keys, at the top level or per subtree.
    pub fn merge_with(self, default: MergeStrategy) -> Result<MergedConfig, StackError> {
        let mut config = Value::Null;
        let mut sources = Vec::with_capacity(self.layers.len());

        for layer in self.layers {
            yaml_merge_with(&mut config, layer.value, &layer.source.label, default)?;
            sources.push(layer.source);
        }

        Ok(MergedConfig {
            created_at: Utc::now(),
            config,
            sources,
        })
    }
}

/// Merged configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedConfig {
    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration tree
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<LayerSource>,
}

impl MergedConfig {
    /// Get a config value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as str
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
