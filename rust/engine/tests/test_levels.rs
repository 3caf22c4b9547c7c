use std::collections::HashSet;

use bjtrain_engine::errors::TrainerError;
use bjtrain_engine::levels::{keys_for_level, level_keys, level_name, MAX_LEVEL};

fn canonical_keys() -> HashSet<String> {
    let mut keys: HashSet<String> = (5..=20).map(|v| v.to_string()).collect();
    keys.extend((2..=9).map(|v| format!("A{v}")));
    keys.extend(["22", "33", "44", "55", "66", "77", "88", "99", "TT", "AA"].map(String::from));
    keys
}

#[test]
fn level_names_are_defined_for_0_through_4() {
    assert_eq!(level_name(0).unwrap(), "All Hands");
    assert_eq!(level_name(1).unwrap(), "Fundamentals");
    assert_eq!(level_name(2).unwrap(), "Standard Decisions");
    assert_eq!(level_name(3).unwrap(), "Doubles & Complex Splits");
    assert_eq!(level_name(4).unwrap(), "Expert");
}

#[test]
fn level_zero_is_the_union_of_all_levels() {
    let union = keys_for_level(0).unwrap();
    let mut combined = HashSet::new();
    for level in 1..=MAX_LEVEL {
        combined.extend(keys_for_level(level).unwrap());
    }
    assert_eq!(union, combined);
}

#[test]
fn all_34_canonical_keys_are_reachable_from_level_zero() {
    let union: HashSet<String> = keys_for_level(0)
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(union, canonical_keys());
    assert_eq!(union.len(), 34);
}

#[test]
fn non_zero_levels_partition_the_keys_disjointly() {
    let mut seen = HashSet::new();
    for level in 1..=MAX_LEVEL {
        for key in level_keys(level).unwrap() {
            assert!(seen.insert(*key), "key {key} appears in more than one level");
        }
    }
    assert_eq!(seen.len(), 34);
}

#[test]
fn level_sizes_match_the_curriculum() {
    assert_eq!(level_keys(1).unwrap().len(), 12);
    assert_eq!(level_keys(2).unwrap().len(), 11);
    assert_eq!(level_keys(3).unwrap().len(), 8);
    assert_eq!(level_keys(4).unwrap().len(), 3);
}

#[test]
fn invalid_level_names_the_value_and_range() {
    let err = level_name(9).unwrap_err();
    match &err {
        TrainerError::InvalidLevel { level, max } => {
            assert_eq!(*level, 9);
            assert_eq!(*max, 4);
        }
        other => panic!("expected InvalidLevel, got {other:?}"),
    }
    assert!(err.to_string().contains('9'));
    assert!(err.to_string().contains("0-4"));
}

#[test]
fn invalid_level_rejected_by_keys_lookup() {
    assert!(matches!(
        keys_for_level(5).unwrap_err(),
        TrainerError::InvalidLevel { level: 5, max: 4 }
    ));
}
