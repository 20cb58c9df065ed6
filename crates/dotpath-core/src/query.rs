//! Collection queries: filter entries by property criteria.
//!
//! A collection is a [`Sequence`] whose entries are themselves sequences
//! (records). [`Criteria`] hold one or more *groups*; each group maps a
//! dot-path to an expected value. An entry matches when **any** group has
//! **every** path comparison succeed (OR of ANDs).
//!
//! ```text
//! [{"a": 1, "b": 2}, {"a": 2}]   ->   (a == 1 AND b == 2) OR (a == 2)
//! ```
//!
//! Entries that are not non-empty sequences never match.

use crate::compare::MatchType;
use crate::flatten::{flatten_sequence, Levels, DEFAULT_DELIMITER};
use crate::path::read_ref;
use crate::value::{Key, Scalar, Sequence, Value};

/// OR-of-AND property criteria.
///
/// Every group is flattened with the default delimiter on construction, so
/// a nested expected value such as `{"role": "admin"}` under `"user"` becomes
/// the path `"user.role"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    groups: Vec<Sequence>,
}

impl Criteria {
    /// A single group: every property must match.
    pub fn all(group: &Sequence) -> Self {
        Self {
            groups: vec![flatten_group(group)],
        }
    }

    /// Several groups: an entry matches if any one group matches in full.
    pub fn any<'a, I>(groups: I) -> Self
    where
        I: IntoIterator<Item = &'a Sequence>,
    {
        Self {
            groups: groups.into_iter().map(flatten_group).collect(),
        }
    }

    /// Interpret a dynamic value as criteria.
    ///
    /// A sequence whose first value is itself a sequence is a list of groups
    /// (non-sequence members are ignored); any other sequence is a single
    /// group. A scalar is treated like an empty group, which every non-empty
    /// entry satisfies.
    ///
    /// A single group with a nested expected value in first position, such as
    /// `{"user": {"role": "admin"}}`, reads as a list of groups. Wrap it in a
    /// list or build it with [`Criteria::all`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Sequence(seq) if is_group_list(seq) => {
                Criteria::any(seq.values().filter_map(Value::as_sequence))
            }
            Value::Sequence(seq) => Criteria::all(seq),
            Value::Scalar(_) => Criteria::all(&Sequence::new()),
        }
    }

    /// The flattened groups, in evaluation order.
    pub fn groups(&self) -> &[Sequence] {
        &self.groups
    }

    /// Whether `entry` satisfies these criteria under `match_type`.
    pub fn matches(&self, entry: &Value, match_type: MatchType) -> bool {
        if entry.as_non_empty_sequence().is_none() {
            return false;
        }
        let null = Value::NULL;
        self.groups.iter().any(|group| {
            group.iter().all(|(path, expected)| {
                let actual = read_ref(entry, &path.to_string()).unwrap_or(&null);
                match_type.matches(actual, expected)
            })
        })
    }
}

fn is_group_list(seq: &Sequence) -> bool {
    seq.first().is_some_and(|(_, value)| value.is_sequence())
}

fn flatten_group(group: &Sequence) -> Sequence {
    flatten_sequence(group, DEFAULT_DELIMITER, Levels::Unlimited)
}

impl From<&Value> for Criteria {
    fn from(value: &Value) -> Self {
        Criteria::from_value(value)
    }
}

impl From<Value> for Criteria {
    fn from(value: Value) -> Self {
        Criteria::from_value(&value)
    }
}

impl From<serde_json::Value> for Criteria {
    fn from(json: serde_json::Value) -> Self {
        Criteria::from_value(&Value::from(json))
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Keep the entries that match `criteria`.
///
/// Keys are preserved when the collection is associative or when
/// `force_key_preservation` is set; otherwise the result is renumbered
/// `0..m-1`.
///
/// # Examples
///
/// ```
/// use dotpath_core::{filter_where, Criteria, MatchType, Value};
/// use serde_json::json;
///
/// let items = Value::from(json!([{"a": 1}, {"a": 2}, {"a": "1"}]));
/// let items = items.as_sequence().unwrap();
/// let found = filter_where(items, &Criteria::from(json!({"a": 1})), MatchType::Loose, false);
/// assert_eq!(Value::from(found), Value::from(json!([{"a": 1}, {"a": "1"}])));
/// ```
pub fn filter_where(
    collection: &Sequence,
    criteria: &Criteria,
    match_type: MatchType,
    force_key_preservation: bool,
) -> Sequence {
    select(collection, force_key_preservation, |entry| {
        criteria.matches(entry, match_type)
    })
}

/// Keep the entries that do **not** match `criteria`: the complement of
/// [`filter_where`], so entries that are not sequences are kept. Same key
/// preservation policy.
pub fn filter_where_not(
    collection: &Sequence,
    criteria: &Criteria,
    match_type: MatchType,
    force_key_preservation: bool,
) -> Sequence {
    select(collection, force_key_preservation, |entry| {
        !criteria.matches(entry, match_type)
    })
}

fn select<F>(collection: &Sequence, force_key_preservation: bool, mut keep: F) -> Sequence
where
    F: FnMut(&Value) -> bool,
{
    let preserve_keys = force_key_preservation || collection.is_associative();
    let kept = collection
        .iter()
        .filter(|(_, entry)| keep(entry))
        .map(|(key, entry)| (key.clone(), entry.clone()));
    if preserve_keys {
        kept.collect()
    } else {
        Sequence::from_values(kept.map(|(_, entry)| entry))
    }
}

/// The first entry matching `criteria`, with its original key.
pub fn find_first_where<'a>(
    collection: &'a Sequence,
    criteria: &Criteria,
    match_type: MatchType,
) -> Option<(&'a Key, &'a Value)> {
    collection
        .iter()
        .find(|(_, entry)| criteria.matches(entry, match_type))
}

/// The first entry **not** matching `criteria`, with its original key.
pub fn find_first_where_not<'a>(
    collection: &'a Sequence,
    criteria: &Criteria,
    match_type: MatchType,
) -> Option<(&'a Key, &'a Value)> {
    collection
        .iter()
        .find(|(_, entry)| !criteria.matches(entry, match_type))
}

// ============================================================================
// Predicate search
// ============================================================================

/// The outcome of a [`find_first`] predicate.
///
/// Only an exact boolean `true` selects an entry. A dynamic [`Value`] result
/// that is merely truthy (`1`, `"yes"`, a non-empty sequence) does not.
pub trait Verdict {
    fn is_match(&self) -> bool;
}

impl Verdict for bool {
    fn is_match(&self) -> bool {
        *self
    }
}

impl Verdict for Value {
    fn is_match(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Bool(true)))
    }
}

/// Linear scan for the first entry whose predicate yields boolean `true`.
/// The predicate receives the entry and its key.
pub fn find_first<P, R>(collection: &Sequence, mut predicate: P) -> Option<(&Key, &Value)>
where
    P: FnMut(&Value, &Key) -> R,
    R: Verdict,
{
    collection
        .iter()
        .find(|(key, entry)| predicate(entry, key).is_match())
}
