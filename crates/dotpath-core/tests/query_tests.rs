use dotpath_core::{
    filter_where, filter_where_not, find_first, find_first_where, find_first_where_not, Criteria,
    DotPathError, Key, MatchType, Sequence, Value,
};
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn seq(json: serde_json::Value) -> Sequence {
    Value::from(json).into_sequence().expect("fixture must be a sequence")
}

/// Mixed collection with a trailing non-record entry.
fn items() -> Sequence {
    seq(json!([
        {"a": 1, "c": 3},
        {"a": 1, "b": 2},
        {"a": 1, "b": 2, "c": 3},
        {"a": 2, "b": 2},
        null
    ]))
}

fn assoc_items() -> Sequence {
    seq(json!({
        "A": {"a": 1, "c": 3},
        "B": {"a": 1, "b": 2},
        "C": {"a": 1, "b": 2, "c": 3},
        "D": {"a": 2, "b": 2}
    }))
}

fn or_criteria() -> Criteria {
    Criteria::from(json!([{"a": 1, "b": 2}, {"a": 2}]))
}

// ============================================================================
// Match type parsing
// ============================================================================

#[test]
fn unknown_match_type_is_invalid_argument() {
    let err = "bogus-match-type".parse::<MatchType>().unwrap_err();
    assert!(matches!(err, DotPathError::InvalidArgument(_)));
    assert!(err.to_string().contains("bogus-match-type"));
}

#[test]
fn match_type_deserializes_from_wire_names() {
    let mt: MatchType = serde_json::from_str(r#""ci""#).unwrap();
    assert_eq!(mt, MatchType::CaseInsensitive);
    let mt: MatchType = serde_json::from_str(r#""strict""#).unwrap();
    assert_eq!(mt, MatchType::Strict);
    assert!(serde_json::from_str::<MatchType>(r#""Asdf""#).is_err());
}

#[test]
fn default_match_type_is_loose() {
    assert_eq!(MatchType::default(), MatchType::Loose);
}

// ============================================================================
// Criteria
// ============================================================================

#[test]
fn single_mapping_is_one_group() {
    let criteria = Criteria::from(json!({"a": 1, "b": 2}));
    assert_eq!(criteria.groups().len(), 1);
}

#[test]
fn list_of_mappings_is_or_groups() {
    assert_eq!(or_criteria().groups().len(), 2);
}

#[test]
fn first_value_sequence_means_group_list() {
    // An associative mapping whose first value is a sequence reads as groups too.
    let criteria = Criteria::from(json!({"x": {"a": 1}, "y": {"b": 2}}));
    assert_eq!(criteria.groups().len(), 2);
    // A scalar first value makes the whole mapping one group.
    let criteria = Criteria::from(json!({"a": 1, "user": {"role": "admin"}}));
    assert_eq!(criteria.groups().len(), 1);
}

#[test]
fn nested_expected_values_are_flattened() {
    let group = seq(json!({"user": {"role": "admin", "team": {"id": 7}}}));
    let criteria = Criteria::all(&group);
    assert_eq!(
        Value::Sequence(criteria.groups()[0].clone()),
        v(json!({"user.role": "admin", "user.team.id": 7}))
    );
}

#[test]
fn empty_criteria_match_every_record() {
    let result = filter_where(&items(), &Criteria::from(json!([])), MatchType::Loose, false);
    assert_eq!(result.len(), 4);
}

// ============================================================================
// filter_where
// ============================================================================

#[test]
fn filter_single_property() {
    let result = filter_where(&items(), &Criteria::from(json!({"a": 1})), MatchType::Loose, false);
    assert_eq!(result.len(), 3);
}

#[test]
fn filter_multiple_properties_are_anded() {
    let result = filter_where(
        &items(),
        &Criteria::from(json!({"a": 1, "b": 2})),
        MatchType::Loose,
        false,
    );
    assert_eq!(result.len(), 2);
}

#[test]
fn filter_groups_are_ored() {
    let result = filter_where(&items(), &or_criteria(), MatchType::Loose, false);
    assert_eq!(
        Value::Sequence(result),
        v(json!([
            {"a": 1, "b": 2},
            {"a": 1, "b": 2, "c": 3},
            {"a": 2, "b": 2}
        ]))
    );
}

#[test]
fn filter_preserves_keys_of_associative_collection() {
    let result = filter_where(&assoc_items(), &or_criteria(), MatchType::Loose, false);
    assert_eq!(
        Value::Sequence(result),
        v(json!({
            "B": {"a": 1, "b": 2},
            "C": {"a": 1, "b": 2, "c": 3},
            "D": {"a": 2, "b": 2}
        }))
    );
}

#[test]
fn filter_forced_key_preservation_on_list() {
    let result = filter_where(&items(), &or_criteria(), MatchType::Loose, true);
    let keys: Vec<Key> = result.keys().cloned().collect();
    assert_eq!(keys, vec![Key::Index(1), Key::Index(2), Key::Index(3)]);
    assert!(result.is_associative());
}

#[test]
fn filter_case_insensitive() {
    let people = seq(json!([{"a": "B"}, {"a": "b"}, {"c": "d"}]));
    let criteria = Criteria::from(json!({"a": "b"}));
    assert_eq!(filter_where(&people, &criteria, MatchType::CaseInsensitive, false).len(), 2);
    assert_eq!(filter_where(&people, &criteria, MatchType::Loose, false).len(), 1);
}

#[test]
fn filter_strict_distinguishes_types() {
    let values = seq(json!([{"a": 1}, {"a": "1"}]));
    let criteria = Criteria::from(json!({"a": "1"}));
    assert_eq!(
        Value::Sequence(filter_where(&values, &criteria, MatchType::Strict, false)),
        v(json!([{"a": "1"}]))
    );
    assert_eq!(filter_where(&values, &criteria, MatchType::Loose, false).len(), 2);
}

#[test]
fn filter_by_nested_path() {
    let users = seq(json!([
        {"name": "a", "profile": {"role": "admin"}},
        {"name": "b", "profile": {"role": "user"}},
        {"name": "c"}
    ]));
    let by_path = filter_where(
        &users,
        &Criteria::from(json!({"profile.role": "admin"})),
        MatchType::Loose,
        false,
    );
    let by_structure = filter_where(
        &users,
        &Criteria::from(json!([{"profile": {"role": "admin"}}])),
        MatchType::Loose,
        false,
    );
    assert_eq!(by_path, by_structure);
    assert_eq!(Value::Sequence(by_path), v(json!([{"name": "a", "profile": {"role": "admin"}}])));
}

#[test]
fn filter_missing_property_matches_null_loosely() {
    let values = seq(json!([{"a": 1}, {"a": 1, "b": null}, {"a": 1, "b": 0}]));
    let result = filter_where(&values, &Criteria::from(json!({"b": null})), MatchType::Loose, false);
    assert_eq!(result.len(), 3);
    let strict = filter_where(&values, &Criteria::from(json!({"b": null})), MatchType::Strict, false);
    assert_eq!(strict.len(), 2);
}

#[test]
fn filter_skips_empty_and_scalar_entries() {
    let values = seq(json!([{}, [], "a", null, {"a": 1}]));
    let result = filter_where(&values, &Criteria::from(json!([])), MatchType::Loose, false);
    assert_eq!(Value::Sequence(result), v(json!([{"a": 1}])));
}

#[test]
fn filter_does_not_mutate_input() {
    let collection = items();
    let before = collection.clone();
    let _ = filter_where(&collection, &or_criteria(), MatchType::Loose, false);
    assert_eq!(collection, before);
}

// ============================================================================
// filter_where_not
// ============================================================================

#[test]
fn filter_not_returns_complement() {
    let values = seq(json!([{"a": 1}, {"a": 2}]));
    let result = filter_where_not(&values, &Criteria::from(json!({"a": 1})), MatchType::Loose, false);
    assert_eq!(Value::Sequence(result), v(json!([{"a": 2}])));
}

#[test]
fn filter_not_keeps_non_record_entries() {
    let result = filter_where_not(&items(), &or_criteria(), MatchType::Loose, false);
    assert_eq!(Value::Sequence(result), v(json!([{"a": 1, "c": 3}, null])));
}

#[test]
fn filter_not_preserves_associative_keys() {
    let result = filter_where_not(&assoc_items(), &or_criteria(), MatchType::Loose, false);
    assert_eq!(Value::Sequence(result), v(json!({"A": {"a": 1, "c": 3}})));
}

#[test]
fn filter_not_forced_key_preservation() {
    let result = filter_where_not(&items(), &or_criteria(), MatchType::Loose, true);
    let keys: Vec<Key> = result.keys().cloned().collect();
    assert_eq!(keys, vec![Key::Index(0), Key::Index(4)]);
}

// ============================================================================
// find_first_where / find_first_where_not
// ============================================================================

#[test]
fn find_first_where_returns_first_match_with_key() {
    let values = Sequence::from_pairs([
        (Key::Index(0), v(json!({"a": 1}))),
        (Key::parse("B"), v(json!({"a": 2}))),
    ]);
    let (_, first) = find_first_where(&values, &Criteria::from(json!({"a": 1})), MatchType::Loose).unwrap();
    assert_eq!(first, &v(json!({"a": 1})));

    let (key, value) = find_first_where(&values, &Criteria::from(json!({"a": 2})), MatchType::Loose).unwrap();
    assert_eq!(key, &Key::parse("B"));
    assert_eq!(value, &v(json!({"a": 2})));

    assert!(find_first_where(&values, &Criteria::from(json!({"a": 3})), MatchType::Loose).is_none());
}

#[test]
fn find_first_where_not_returns_first_non_match() {
    let values = Sequence::from_pairs([
        (Key::parse("A"), v(json!({"a": 1}))),
        (Key::Index(0), v(json!({"a": 2}))),
    ]);
    let (_, value) = find_first_where_not(&values, &Criteria::from(json!({"a": 1})), MatchType::Loose).unwrap();
    assert_eq!(value, &v(json!({"a": 2})));

    let (key, value) = find_first_where_not(&values, &Criteria::from(json!({"a": 2})), MatchType::Loose).unwrap();
    assert_eq!(key, &Key::parse("A"));
    assert_eq!(value, &v(json!({"a": 1})));

    assert!(find_first_where_not(
        &values,
        &Criteria::from(json!([{"a": 1}, {"a": 2}])),
        MatchType::Loose
    )
    .is_none());
}

// ============================================================================
// find_first
// ============================================================================

#[test]
fn find_first_with_bool_predicate() {
    let values = seq(json!([{"a": 1}, {"a": 2}]));
    let (key, value) = find_first(&values, |entry, _| entry.get(&"a".into()) == Some(&v(json!(2)))).unwrap();
    assert_eq!(key, &Key::Index(1));
    assert_eq!(value, &v(json!({"a": 2})));

    assert!(find_first(&values, |_, _| false).is_none());
}

#[test]
fn find_first_receives_keys() {
    let values = seq(json!({"a": {"a": 1}, "B": {"a": 2}}));
    let (key, _) = find_first(&values, |_, key| key == &Key::parse("B")).unwrap();
    assert_eq!(key, &Key::parse("B"));
}

#[test]
fn find_first_requires_exact_true() {
    let values = seq(json!([1, 2, 3]));
    // Truthy but not boolean true: no match.
    assert!(find_first(&values, |entry, _| entry.clone()).is_none());
    assert!(find_first(&values, |_, _| v(json!("yes"))).is_none());

    let (_, value) = find_first(&values, |entry, _| Value::from(entry == &v(json!(3)))).unwrap();
    assert_eq!(value, &v(json!(3)));
}
