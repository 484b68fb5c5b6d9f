//! Merge Strategy Semantics Suite
//!
//! End-to-end scenarios through the public API, one per documented
//! behavior: override under the default strategy, deep merge with key-set
//! matching, append without overwrites, disabled subtrees, alias
//! spellings, and strategy failures.

use serde_json::json;
use yaml_stack::{yaml_merge, yaml_merge_with, MergeError, MergeStrategy};

#[test]
fn test_default_strategy_overrides() {
    let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
    let src = json!({"a": "3", "b": "2", "c": [3, 4, 5, {"e": 6}]});

    yaml_merge(&mut dest, src, "layer.yaml").unwrap();

    // The sequence is fully replaced, not merged.
    assert_eq!(dest, json!({"a": "3", "b": "2", "c": [3, 4, 5, {"e": 6}]}));
}

#[test]
fn test_explicit_merge_same_as_default() {
    let expected = json!({"a": "3", "b": "2", "c": [3, 4, 5, {"e": 6}]});

    let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
    yaml_merge(
        &mut dest,
        json!({"a": "3", "b": "2", "c": [3, 4, 5, {"e": 6}]}),
        "",
    )
    .unwrap();
    assert_eq!(dest, expected);

    yaml_merge(&mut dest, json!({"Merge Strategy": "Merge", "a": "3", "b": "2"}), "")
        .unwrap();
    assert_eq!(dest, expected);
}

#[test]
fn test_deep_merge_appends_and_matches_by_key_set() {
    let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
    let src = json!({
        "Merge Strategy": "deep_merge",
        "a": "3",
        "b": "2",
        "c": [3, 4, 5, {"e": 6}]
    });

    yaml_merge(&mut dest, src, "").unwrap();

    // 3 is already present and deduplicates; {"d": 4} and {"e": 6} have
    // disjoint key sets, so both survive as separate elements.
    assert_eq!(
        dest,
        json!({"a": "3", "b": "2", "c": [1, 2, 3, {"d": 4}, 4, 5, {"e": 6}]})
    );
}

#[test]
fn test_append_extends_lists_and_keeps_scalars() {
    let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
    let src = json!({
        "Merge Strategy": "append",
        "a": "3",
        "b": "2",
        "c": [5, 6, 7, {"e": 8}]
    });

    yaml_merge(&mut dest, src, "").unwrap();

    assert_eq!(
        dest,
        json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}, 5, 6, 7, {"e": 8}]})
    );
}

#[test]
fn test_append_twice_never_overwrites() {
    let mut dest = json!({});
    yaml_merge(&mut dest, json!({"Merge Strategy": "append", "x": 1, "x2": 2}), "")
        .unwrap();
    yaml_merge_with(
        &mut dest,
        json!({"x": 99, "x3": 3}),
        "",
        MergeStrategy::Append,
    )
    .unwrap();

    assert_eq!(dest, json!({"x": 1, "x2": 2, "x3": 3}));
}

#[test]
fn test_disabled_subtree_invariance() {
    let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
    let expected = dest.clone();
    let src = json!({
        "Merge Strategy": "disabled",
        "a": "3",
        "b": "2",
        "c": [3, 4, 5, {"e": 6}]
    });

    yaml_merge(&mut dest, src, "").unwrap();
    assert_eq!(dest, expected);
}

#[test]
fn test_disabled_aliases() {
    for name in ["DISABLED", "disable", "Disabled"] {
        let mut dest = json!({"a": "1", "b": "2"});
        let src = json!({"Merge Strategy": name, "a": "3", "b": "9"});
        yaml_merge(&mut dest, src, "").unwrap();
        assert_eq!(dest, json!({"a": "1", "b": "2"}), "alias {name}");
    }
}

#[test]
fn test_deep_merge_aliases() {
    for name in [
        "deep_merge",
        "DEEP_MERGE",
        "deep merge",
        "DEEP MERGE",
        "deepmerge",
        "DEEPMERGE",
        "DeEp_MeRgE",
    ] {
        let mut dest = json!({"a": "1", "b": "2", "c": [1, 2, 3, {"d": 4}]});
        let src = json!({"Merge Strategy": name, "a": "3", "c": [3, 4, 5, {"e": 6}]});
        yaml_merge(&mut dest, src, "").unwrap();
        assert_eq!(
            dest,
            json!({"a": "3", "b": "2", "c": [1, 2, 3, {"d": 4}, 4, 5, {"e": 6}]}),
            "alias {name}"
        );
    }
}

#[test]
fn test_merge_aliases() {
    for name in ["MERGE", "merge", "Merge"] {
        let mut dest = json!({"a": "1", "b": "2"});
        let src = json!({"Merge Strategy": name, "a": "3", "b": "4"});
        yaml_merge(&mut dest, src, "").unwrap();
        assert_eq!(dest, json!({"a": "3", "b": "4"}), "alias {name}");
    }
}

#[test]
fn test_empty_source_and_destination() {
    let mut dest = json!({});
    yaml_merge(&mut dest, json!({"Merge Strategy": "merge", "a": "3"}), "").unwrap();
    assert_eq!(dest, json!({"a": "3"}));

    let mut dest = json!({"a": "1", "b": "2"});
    yaml_merge(&mut dest, json!({}), "").unwrap();
    assert_eq!(dest, json!({"a": "1", "b": "2"}));
}

#[test]
fn test_nested_mapping_merge() {
    let mut dest = json!({"a": "1", "b": "2", "c": {"d": "3"}});
    let src = json!({"Merge Strategy": "merge", "a": "4", "c": {"e": "5"}});

    yaml_merge(&mut dest, src, "").unwrap();
    assert_eq!(dest, json!({"a": "4", "b": "2", "c": {"d": "3", "e": "5"}}));
}

#[test]
fn test_nested_sequences_per_strategy() {
    // merge: the outer sequence is replaced.
    let mut dest = json!({"a": [[1, 2], [3, 4]]});
    yaml_merge(&mut dest, json!({"Merge Strategy": "merge", "a": [[5, 6]]}), "").unwrap();
    assert_eq!(dest, json!({"a": [[5, 6]]}));

    // deep_merge: nested sequences are appended as new entries.
    let mut dest = json!({"a": [[1, 2], [3, 4]]});
    yaml_merge(
        &mut dest,
        json!({"Merge Strategy": "deep_merge", "a": [[5, 6]]}),
        "",
    )
    .unwrap();
    assert_eq!(dest, json!({"a": [[1, 2], [3, 4], [5, 6]]}));

    // append: a novel nested sequence is appended.
    let mut dest = json!({"a": [[1, 2], [3, 4]]});
    yaml_merge(&mut dest, json!({"Merge Strategy": "append", "a": [[5, 6]]}), "")
        .unwrap();
    assert_eq!(dest, json!({"a": [[1, 2], [3, 4], [5, 6]]}));
}

#[test]
fn test_key_set_determinism() {
    // Two source elements with the same key set collapse into the single
    // matching destination element, which keeps its position.
    let mut dest = json!({"c": ["front", {"id": 0, "v": "old"}, "back"]});
    let src = json!({
        "Merge Strategy": "deep_merge",
        "c": [{"id": 1, "v": "mid"}, {"id": 2, "v": "new"}]
    });

    yaml_merge(&mut dest, src, "").unwrap();
    assert_eq!(dest, json!({"c": ["front", {"id": 2, "v": "new"}, "back"]}));
}

#[test]
fn test_invalid_strategy_is_rejected() {
    let mut dest = json!({"a": "1", "b": "2"});
    let src = json!({"Merge Strategy": "invalid_strategy", "a": "3"});

    let err = yaml_merge(&mut dest, src, "broken.yaml").unwrap_err();
    let MergeError::InvalidStrategy { name, label } = err;
    assert_eq!(name, "invalid_strategy");
    assert_eq!(label, "broken.yaml");
}

#[test]
fn test_strategy_inherited_by_children() {
    // append at the top level propagates into nested mappings that do not
    // re-declare a strategy.
    let mut dest = json!({"outer": {"kept": 1}});
    let src = json!({
        "Merge Strategy": "append",
        "outer": {"kept": 99, "added": 2}
    });

    yaml_merge(&mut dest, src, "").unwrap();
    assert_eq!(dest, json!({"outer": {"kept": 1, "added": 2}}));
}

#[test]
fn test_merged_output_carries_no_control_keys() {
    let mut dest = json!({});
    let src = json!({
        "Merge Strategy": "deep_merge",
        "a": {"Merge Strategy": "merge", "x": 1},
        "b": [{"Merge Strategy": "append", "y": 2}],
        "c": {"d": {"Merge Strategy": "append", "z": 3}}
    });

    yaml_merge(&mut dest, src, "").unwrap();
    assert_eq!(
        dest,
        json!({"a": {"x": 1}, "b": [{"y": 2}], "c": {"d": {"z": 3}}})
    );
}
