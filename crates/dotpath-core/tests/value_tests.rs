use dotpath_core::{Key, Scalar, Sequence, Value};
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

// ============================================================================
// Structural classifier
// ============================================================================

#[test]
fn in_order_integer_keys_are_positional() {
    let seq = Sequence::from_pairs([(0u64, "a"), (1u64, "b")]);
    assert!(!seq.is_associative());
}

#[test]
fn out_of_order_integer_keys_are_associative() {
    let seq = Sequence::from_pairs([(1u64, "a"), (0u64, "b")]);
    assert!(seq.is_associative());
}

#[test]
fn gap_in_integer_keys_is_associative() {
    let seq = Sequence::from_pairs([(0u64, "a"), (2u64, "b")]);
    assert!(seq.is_associative());
}

#[test]
fn string_keys_are_associative() {
    let seq = v(json!({"a": "b", "c": "d"}));
    assert!(seq.as_sequence().unwrap().is_associative());
}

#[test]
fn empty_sequence_is_positional() {
    assert!(!Sequence::new().is_associative());
}

#[test]
fn json_array_is_positional() {
    let seq = v(json!(["a", "b", "c"]));
    assert!(!seq.as_sequence().unwrap().is_associative());
}

// ============================================================================
// Key normalization
// ============================================================================

#[test]
fn numeric_object_keys_become_index_keys() {
    let value = v(json!({"0": "a", "1": "b"}));
    let seq = value.as_sequence().unwrap();
    assert_eq!(seq.keys().cloned().collect::<Vec<_>>(), vec![Key::Index(0), Key::Index(1)]);
    // {"0": .., "1": ..} is indistinguishable from a list.
    assert!(!seq.is_associative());
    assert_eq!(value, v(json!(["a", "b"])));
}

#[test]
fn padded_numeric_keys_stay_names() {
    let value = v(json!({"01": "a"}));
    let key = value.as_sequence().unwrap().keys().next().unwrap().clone();
    assert_eq!(key, Key::Name("01".into()));
}

// ============================================================================
// Truthiness and rendering
// ============================================================================

#[test]
fn falsy_values() {
    for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([])] {
        assert!(!v(falsy.clone()).is_truthy(), "{falsy} should be falsy");
    }
}

#[test]
fn truthy_values() {
    for truthy in [json!(true), json!(1), json!(-1), json!("a"), json!("0.0"), json!([0]), json!({"a": null})] {
        assert!(v(truthy.clone()).is_truthy(), "{truthy} should be truthy");
    }
}

#[test]
fn render_matches_composite_key_rules() {
    assert_eq!(Value::NULL.render(), "");
    assert_eq!(v(json!(true)).render(), "1");
    assert_eq!(v(json!(false)).render(), "");
    assert_eq!(v(json!(7)).render(), "7");
    assert_eq!(v(json!(2.0)).render(), "2");
    assert_eq!(v(json!(2.5)).render(), "2.5");
    assert_eq!(v(json!("x")).render(), "x");
    assert_eq!(v(json!([1])).render(), "Array");
}

// ============================================================================
// JSON interop
// ============================================================================

#[test]
fn from_json_str_preserves_key_order() {
    let value = Value::from_json_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<String> = value
        .as_sequence()
        .unwrap()
        .keys()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn to_json_string_emits_arrays_for_positional_sequences() {
    let value = v(json!({"list": [1, 2], "map": {"a": true}}));
    assert_eq!(
        value.to_json_string().unwrap(),
        r#"{"list":[1,2],"map":{"a":true}}"#
    );
}

#[test]
fn associative_integer_keys_serialize_as_object() {
    let value = Value::Sequence(Sequence::from_pairs([(1u64, "a"), (0u64, "b")]));
    assert_eq!(value.to_json_string().unwrap(), r#"{"1":"a","0":"b"}"#);
}

#[test]
fn to_json_matches_serde_json_value() {
    let original = json!({"a": [1, {"b": null}], "c": "d", "e": 1.5});
    assert_eq!(v(original.clone()).to_json(), original);
}

#[test]
fn invalid_json_is_an_error() {
    let err = Value::from_json_str("{not json").unwrap_err();
    assert!(err.to_string().contains("JSON parse error"));
}

#[test]
fn large_unsigned_numbers_become_floats() {
    let value = Value::from_json_str("18446744073709551615").unwrap();
    assert!(matches!(value, Value::Scalar(Scalar::Float(_))));
}

// ============================================================================
// Sequence editing
// ============================================================================

#[test]
fn insert_replaces_in_place() {
    let mut seq = v(json!({"a": 1, "b": 2})).into_sequence().unwrap();
    let previous = seq.insert(Key::parse("a"), Value::from(3));
    assert_eq!(previous, Some(Value::from(1)));
    assert_eq!(Value::Sequence(seq), v(json!({"a": 3, "b": 2})));
}

#[test]
fn insert_if_absent_keeps_first() {
    let mut seq = Sequence::new();
    assert!(seq.insert_if_absent(Key::parse("a"), Value::from(1)));
    assert!(!seq.insert_if_absent(Key::parse("a"), Value::from(2)));
    assert_eq!(seq.get(&Key::parse("a")), Some(&Value::from(1)));
}

#[test]
fn reindexed_drops_keys() {
    let seq = v(json!({"x": "a", "y": "b"})).into_sequence().unwrap();
    assert_eq!(Value::Sequence(seq.reindexed()), v(json!(["a", "b"])));
}

#[test]
fn push_tracks_index_keys_inserted_later() {
    let mut seq = Sequence::from_pairs([("x", "a")]);
    seq.push(Value::from("b"));
    seq.insert(Key::Index(9), Value::from("c"));
    seq.push(Value::from("d"));
    assert_eq!(Value::Sequence(seq), v(json!({"x": "a", "0": "b", "9": "c", "10": "d"})));
}

#[test]
fn lookups_follow_replaced_and_appended_keys() {
    let mut seq = Sequence::new();
    for i in 0..50_000u64 {
        seq.insert(Key::parse(&format!("k{i}")), Value::from(i as i64));
    }
    seq.insert(Key::parse("k7"), Value::from(-7));
    assert_eq!(seq.len(), 50_000);
    assert_eq!(seq.get(&Key::parse("k7")), Some(&Value::from(-7)));
    assert_eq!(seq.get(&Key::parse("k49999")), Some(&Value::from(49_999)));
    assert!(!seq.contains_key(&Key::parse("k50000")));
    assert_eq!(seq.keys().nth(7), Some(&Key::parse("k7")));
}

#[test]
fn equality_ignores_how_a_sequence_was_built() {
    let pushed = Sequence::from_values(["a", "b"]);
    let inserted = Sequence::from_pairs([(0u64, "a"), (1u64, "b")]);
    assert_eq!(pushed, inserted);
    assert_ne!(pushed, Sequence::from_pairs([(1u64, "b"), (0u64, "a")]));
}
