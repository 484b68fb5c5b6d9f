//! Strategy-driven configuration tree merging
//!
//! Merges a source tree into a destination tree in place. A mapping in the
//! source may declare how its children merge through the reserved
//! `"Merge Strategy"` key; subtrees that declare nothing inherit the
//! strategy in effect for their parent.

mod engine;
mod strategy;

pub use engine::{yaml_merge, yaml_merge_with};
pub use strategy::{MergeError, MergeStrategy, STRATEGY_KEY};
