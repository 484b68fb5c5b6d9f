//! Recursive merge of one configuration tree into another
//!
//! The destination is mutated in place and the source is consumed. The
//! strategy is re-resolved at every mapping boundary the traversal reaches,
//! so any subtree can override the strategy it inherits by declaring the
//! control key.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::strategy::{MergeError, MergeStrategy, STRATEGY_KEY};

/// Merges `src` into `dest` in place under the default strategy.
///
/// `label` is an opaque provenance tag (typically the source file name).
/// It is attached to strategy-resolution errors but never to merged values.
pub fn yaml_merge(dest: &mut Value, src: Value, label: &str) -> Result<(), MergeError> {
    yaml_merge_with(dest, src, label, MergeStrategy::default())
}

/// Merges `src` into `dest` in place, starting from an explicit default
/// strategy.
///
/// A mapping source may still override the default with its own control
/// key. A null source is a no-op; a scalar source replaces the destination
/// under [`MergeStrategy::Merge`] and [`MergeStrategy::DeepMerge`], is only
/// written into a null destination under [`MergeStrategy::Append`], and is
/// ignored under [`MergeStrategy::Disabled`].
pub fn yaml_merge_with(
    dest: &mut Value,
    src: Value,
    label: &str,
    default: MergeStrategy,
) -> Result<(), MergeError> {
    match src {
        Value::Object(mut map) => {
            let strategy = MergeStrategy::resolve(&mut map, default, label)?;
            if strategy == MergeStrategy::Disabled {
                return Ok(());
            }
            merge_mapping(strategy, mapping_slot(dest), map, label)
        }
        Value::Array(items) => {
            if default == MergeStrategy::Disabled {
                return Ok(());
            }
            merge_sequence(default, sequence_slot(dest), items, label)
        }
        // An empty document contributes nothing.
        Value::Null => Ok(()),
        scalar => {
            match default {
                MergeStrategy::Disabled => {}
                MergeStrategy::Append => {
                    if dest.is_null() {
                        *dest = scalar;
                    }
                }
                MergeStrategy::Merge | MergeStrategy::DeepMerge => *dest = scalar,
            }
            Ok(())
        }
    }
}

/// Merges the entries of a source mapping into a destination mapping.
///
/// The strategy passed in is the one already resolved for this mapping;
/// each nested source mapping resolves its own before recursion.
fn merge_mapping(
    strategy: MergeStrategy,
    dest: &mut Map<String, Value>,
    src: Map<String, Value>,
    label: &str,
) -> Result<(), MergeError> {
    if strategy == MergeStrategy::Disabled {
        return Ok(());
    }

    for (key, value) in src {
        match value {
            Value::Object(mut child) => {
                let nested = MergeStrategy::resolve(&mut child, strategy, label)?;
                if nested == MergeStrategy::Disabled {
                    // Contributes nothing, not even an empty mapping.
                    continue;
                }
                if strategy == MergeStrategy::Append
                    && dest.get(&key).is_some_and(|v| !v.is_object())
                {
                    // Append never overwrites an existing value.
                    continue;
                }
                // Merge and DeepMerge replace a mismatched destination kind
                // outright; adoption recurses, so an adopted mapping's own
                // nested overrides are honored and its control keys consumed.
                let slot = dest.entry(key).or_insert_with(|| Value::Object(Map::new()));
                merge_mapping(nested, mapping_slot(slot), child, label)?;
            }
            Value::Array(items) => match strategy {
                MergeStrategy::Merge => {
                    dest.insert(key, stripped(Value::Array(items)));
                }
                MergeStrategy::DeepMerge | MergeStrategy::Append => {
                    if strategy == MergeStrategy::Append
                        && dest.get(&key).is_some_and(|v| !v.is_array())
                    {
                        continue;
                    }
                    let slot = dest.entry(key).or_insert_with(|| Value::Array(Vec::new()));
                    merge_sequence(strategy, sequence_slot(slot), items, label)?;
                }
                MergeStrategy::Disabled => {}
            },
            scalar => {
                if strategy != MergeStrategy::Append || !dest.contains_key(&key) {
                    dest.insert(key, scalar);
                }
            }
        }
    }

    Ok(())
}

/// Merges a source sequence into a destination sequence.
fn merge_sequence(
    strategy: MergeStrategy,
    dest: &mut Vec<Value>,
    src: Vec<Value>,
    label: &str,
) -> Result<(), MergeError> {
    match strategy {
        MergeStrategy::Merge => {
            // Full replacement, no element-wise logic.
            *dest = src.into_iter().map(stripped).collect();
        }
        MergeStrategy::Append => {
            for item in src {
                let item = stripped(item);
                if !dest.contains(&item) {
                    dest.push(item);
                }
            }
        }
        MergeStrategy::DeepMerge => deep_merge_sequence(dest, src, label)?,
        MergeStrategy::Disabled => {}
    }
    Ok(())
}

/// Deep merge of a sequence, element kind dependent and in source order:
/// scalars deduplicate by equality, nested sequences are rebuilt and
/// appended, and mapping elements merge into the destination mapping with
/// the same key set.
///
/// The earliest destination element with a given key set wins the match,
/// and appended elements are registered as candidates, so repeated source
/// elements with one key set collapse into a single destination element.
fn deep_merge_sequence(
    dest: &mut Vec<Value>,
    src: Vec<Value>,
    label: &str,
) -> Result<(), MergeError> {
    let mut by_key_set: HashMap<Vec<String>, usize> = HashMap::new();
    for (index, existing) in dest.iter().enumerate() {
        if let Value::Object(map) = existing {
            by_key_set.entry(key_set(map)).or_insert(index);
        }
    }

    for item in src {
        match item {
            Value::Object(mut child) => {
                let nested = MergeStrategy::resolve(&mut child, MergeStrategy::DeepMerge, label)?;
                if nested == MergeStrategy::Disabled {
                    continue;
                }
                let keys = key_set(&child);
                let index = match by_key_set.get(&keys) {
                    Some(&index) => index,
                    None => {
                        dest.push(Value::Object(Map::new()));
                        let index = dest.len() - 1;
                        by_key_set.insert(keys, index);
                        index
                    }
                };
                merge_mapping(nested, mapping_slot(&mut dest[index]), child, label)?;
            }
            Value::Array(items) => {
                // Nested sequences are never matched against existing ones.
                let mut rebuilt = Vec::new();
                merge_sequence(MergeStrategy::DeepMerge, &mut rebuilt, items, label)?;
                dest.push(Value::Array(rebuilt));
            }
            scalar => {
                if !dest.contains(&scalar) {
                    dest.push(scalar);
                }
            }
        }
    }

    Ok(())
}

/// Identity of a mapping inside a sequence: its sorted key list.
fn key_set(map: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Returns the mapping behind `slot`, resetting any other kind to empty.
fn mapping_slot(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just reset to a mapping"),
    }
}

/// Returns the sequence behind `slot`, resetting any other kind to empty.
fn sequence_slot(slot: &mut Value) -> &mut Vec<Value> {
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just reset to a sequence"),
    }
}

/// Scrubs control keys from a value adopted wholesale, so merged output
/// never carries the sentinel.
fn stripped(mut value: Value) -> Value {
    strip_control_keys(&mut value);
    value
}

fn strip_control_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.shift_remove(STRATEGY_KEY);
            for child in map.values_mut() {
                strip_control_keys(child);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                strip_control_keys(item);
            }
        }
        _ => {}
    }
}
