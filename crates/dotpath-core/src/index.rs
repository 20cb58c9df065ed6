//! Key and group a collection by one or more dot-path properties.
//!
//! The composite key of an entry is the `.`-joined rendering of each property
//! read with [`read`](crate::path::read): properties `["a", "b"]` on
//! `{"a": "x", "b": 2}` give the key `"x.2"`. The join character is always
//! `.`, independent of any flatten delimiter.

use serde::Serialize;

use crate::path::read_ref;
use crate::value::{Key, Sequence, Value};

/// Result of [`key_by_property_with_meta`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KeyedIndex {
    /// Qualifying entries by composite key. The last entry for a key wins.
    pub keyed: Sequence,
    /// Entries that were keyed and later replaced, in replacement order.
    pub overwritten: Vec<Value>,
    /// Entries with at least one missing or falsy property.
    pub invalid: Vec<Value>,
}

impl From<KeyedIndex> for Value {
    fn from(index: KeyedIndex) -> Self {
        Value::Sequence(Sequence::from_pairs([
            ("keyed", Value::Sequence(index.keyed)),
            ("overwritten", Value::from(index.overwritten)),
            ("invalid", Value::from(index.invalid)),
        ]))
    }
}

/// Key the collection by composite property value. See
/// [`key_by_property_with_meta`] for the qualification and collision rules.
pub fn key_by_property<S: AsRef<str>>(collection: &Sequence, properties: &[S]) -> Sequence {
    key_by_property_with_meta(collection, properties).keyed
}

/// Key the collection by composite property value, reporting what was
/// dropped.
///
/// An entry qualifies only if every property resolves to a truthy value;
/// anything else goes to `invalid`. When two qualifying entries share a
/// composite key, the later one replaces the earlier one (which keeps its
/// position) and the replaced entry is recorded in `overwritten`.
///
/// A property listed more than once contributes one segment per occurrence:
/// `["a", "a"]` keys `{"a": "x"}` under `"x.x"`.
///
/// # Examples
///
/// ```
/// use dotpath_core::{key_by_property_with_meta, Value};
/// use serde_json::json;
///
/// let items = Value::from(json!([{"a": "b"}, {"a": "b", "b": "c"}, {"c": "d"}, {"a": "c"}]));
/// let index = key_by_property_with_meta(items.as_sequence().unwrap(), &["a"]);
/// assert_eq!(Value::from(index.keyed), Value::from(json!({"b": {"a": "b", "b": "c"}, "c": {"a": "c"}})));
/// assert_eq!(index.overwritten, vec![Value::from(json!({"a": "b"}))]);
/// assert_eq!(index.invalid, vec![Value::from(json!({"c": "d"}))]);
/// ```
pub fn key_by_property_with_meta<S: AsRef<str>>(
    collection: &Sequence,
    properties: &[S],
) -> KeyedIndex {
    let mut index = KeyedIndex::default();

    for entry in collection.values() {
        let Some(key) = qualifying_key(entry, properties) else {
            index.invalid.push(entry.clone());
            continue;
        };
        if let Some(previous) = index.keyed.insert(Key::from(key), entry.clone()) {
            index.overwritten.push(previous);
        }
    }

    tracing::debug!(
        keyed = index.keyed.len(),
        overwritten = index.overwritten.len(),
        invalid = index.invalid.len(),
        "keyed collection by property"
    );
    index
}

/// Group entries by composite property value. Every entry is kept: missing
/// properties contribute an empty segment to the key, and entries sharing a
/// key are appended to that key's group in collection order.
///
/// # Examples
///
/// ```
/// use dotpath_core::{group_by_property, Value};
/// use serde_json::json;
///
/// let items = Value::from(json!([{"a": "b"}, {"c": "d"}, {"a": "b", "x": 1}]));
/// let groups = group_by_property(items.as_sequence().unwrap(), &["a"]);
/// assert_eq!(
///     Value::from(groups),
///     Value::from(json!({"b": [{"a": "b"}, {"a": "b", "x": 1}], "": [{"c": "d"}]}))
/// );
/// ```
pub fn group_by_property<S: AsRef<str>>(collection: &Sequence, properties: &[S]) -> Sequence {
    let mut groups = Sequence::new();
    for entry in collection.values() {
        let key = composite_key(entry, properties);
        match groups.get_mut(&key) {
            Some(Value::Sequence(members)) => members.push(entry.clone()),
            _ => {
                groups.insert(key, Value::from(vec![entry.clone()]));
            }
        }
    }
    groups
}

/// The composite key of `entry`, or `None` if any property is falsy.
fn qualifying_key<S: AsRef<str>>(entry: &Value, properties: &[S]) -> Option<String> {
    let mut segments = Vec::with_capacity(properties.len());
    for property in properties {
        let value = read_ref(entry, property.as_ref()).filter(|v| v.is_truthy())?;
        segments.push(value.render());
    }
    Some(segments.join("."))
}

fn composite_key<S: AsRef<str>>(entry: &Value, properties: &[S]) -> Key {
    let segments: Vec<String> = properties
        .iter()
        .map(|property| read_ref(entry, property.as_ref()).map_or_else(String::new, Value::render))
        .collect();
    Key::from(segments.join("."))
}
