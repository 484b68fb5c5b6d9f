//! Merge strategy registry and control-key resolution
//!
//! A source mapping may carry the reserved `"Merge Strategy"` key to select
//! how its children are merged into the destination. The key is consumed
//! during resolution, so it never appears in merged output.

use serde_json::{Map, Value};

/// Reserved mapping key that selects the merge strategy for a subtree.
pub const STRATEGY_KEY: &str = "Merge Strategy";

/// Named merge behaviors, selectable per subtree via [`STRATEGY_KEY`].
///
/// A mapping that does not declare a strategy inherits the one in effect
/// for its parent; the top-level default is [`MergeStrategy::Merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Recursive override: nested mappings merge key by key, everything
    /// else (sequences included) is replaced by the source value.
    #[default]
    Merge,

    /// Merges nested mappings and appends sequences, matching mapping
    /// elements of a sequence by their key set.
    DeepMerge,

    /// Adds new keys and new sequence elements; existing values are never
    /// overwritten.
    Append,

    /// The subtree is skipped entirely.
    Disabled,
}

impl MergeStrategy {
    const ALL: [MergeStrategy; 4] = [
        MergeStrategy::Merge,
        MergeStrategy::DeepMerge,
        MergeStrategy::Append,
        MergeStrategy::Disabled,
    ];

    /// Accepted spellings, compared case-insensitively.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            MergeStrategy::Merge => &["merge"],
            MergeStrategy::DeepMerge => &["deep_merge", "deep merge", "deepmerge"],
            MergeStrategy::Append => &["append"],
            MergeStrategy::Disabled => &["disabled", "disable"],
        }
    }

    /// Canonical name of the strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::Merge => "merge",
            MergeStrategy::DeepMerge => "deep_merge",
            MergeStrategy::Append => "append",
            MergeStrategy::Disabled => "disabled",
        }
    }

    /// Looks up a configured name against the alias table.
    pub fn from_name(name: &str) -> Option<MergeStrategy> {
        let needle = name.to_lowercase();
        MergeStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.aliases().contains(&needle.as_str()))
    }

    /// Pops [`STRATEGY_KEY`] from a source mapping and resolves the
    /// strategy for merging its children.
    ///
    /// An absent key, a null value, or an empty name inherits `inherited`.
    /// Anything else must match an alias; an unrecognized value is a hard
    /// error, never a silent fallback. The remaining keys keep their
    /// original order.
    pub fn resolve(
        src: &mut Map<String, Value>,
        inherited: MergeStrategy,
        label: &str,
    ) -> Result<MergeStrategy, MergeError> {
        match src.shift_remove(STRATEGY_KEY) {
            None | Some(Value::Null) => Ok(inherited),
            Some(Value::String(name)) if name.is_empty() => Ok(inherited),
            Some(Value::String(name)) => {
                MergeStrategy::from_name(&name).ok_or_else(|| MergeError::InvalidStrategy {
                    name,
                    label: label.to_string(),
                })
            }
            Some(other) => Err(MergeError::InvalidStrategy {
                name: other.to_string(),
                label: label.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Merge engine errors
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The control key held a value that matches no known strategy alias.
    #[error("invalid merge strategy: {name}")]
    InvalidStrategy {
        /// The offending configured value
        name: String,
        /// Provenance label of the source being merged
        label: String,
    },
}
