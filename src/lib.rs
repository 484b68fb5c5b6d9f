//! yaml-stack - Strategy-driven layered configuration merging
//!
//! This crate merges hierarchical configuration trees layer over layer.
//! A source document can pick how each of its subtrees combines with what
//! came before through a reserved `"Merge Strategy"` mapping key, and a
//! [`ConfigStack`] folds whole files into one tree while tracking where
//! every layer came from.

pub mod loader;
pub mod merge;
pub mod stack;

pub use loader::{load_config_file, LoadError};
pub use merge::{yaml_merge, yaml_merge_with, MergeError, MergeStrategy, STRATEGY_KEY};
pub use stack::{ConfigStack, LayerSource, MergedConfig, StackError};
