//! Key projection: keep or remove named keys on records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DotPathError;
use crate::value::{Key, Sequence, Value};

/// What happens to a key that is projected away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalAction {
    /// Drop the key entirely.
    #[default]
    Delete,
    /// Keep the key with a `null` value.
    Nullify,
}

impl RemovalAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RemovalAction::Delete => "delete",
            RemovalAction::Nullify => "nullify",
        }
    }
}

impl fmt::Display for RemovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalAction {
    type Err = DotPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "delete" => Ok(RemovalAction::Delete),
            "nullify" => Ok(RemovalAction::Nullify),
            other => {
                tracing::debug!(removal_action = other, "rejected removal action");
                Err(DotPathError::invalid(format!(
                    "'{other}' is not a valid removal action. Must be one of delete, nullify."
                )))
            }
        }
    }
}

/// Reduce `item` to the given keys. Other keys are deleted or nullified.
pub fn keep_keys<S: AsRef<str>>(item: &Sequence, keys: &[S], action: RemovalAction) -> Sequence {
    let selected = parse_keys(keys);
    project(item, action, |key| selected.contains(key))
}

/// Remove the given keys from `item`, deleting or nullifying them.
pub fn remove_keys<S: AsRef<str>>(item: &Sequence, keys: &[S], action: RemovalAction) -> Sequence {
    let selected = parse_keys(keys);
    project(item, action, |key| !selected.contains(key))
}

/// [`keep_keys`] applied to every entry of a collection. Entries that are not
/// sequences become empty sequences; collection keys are preserved.
pub fn keep_keys_in_collection<S: AsRef<str>>(
    collection: &Sequence,
    keys: &[S],
    action: RemovalAction,
) -> Sequence {
    let selected = parse_keys(keys);
    project_collection(collection, |item| {
        project(item, action, |key| selected.contains(key))
    })
}

/// [`remove_keys`] applied to every entry of a collection. Entries that are
/// not sequences become empty sequences; collection keys are preserved.
pub fn remove_keys_in_collection<S: AsRef<str>>(
    collection: &Sequence,
    keys: &[S],
    action: RemovalAction,
) -> Sequence {
    let selected = parse_keys(keys);
    project_collection(collection, |item| {
        project(item, action, |key| !selected.contains(key))
    })
}

fn parse_keys<S: AsRef<str>>(keys: &[S]) -> Vec<Key> {
    keys.iter().map(|k| Key::parse(k.as_ref())).collect()
}

fn project<F>(item: &Sequence, action: RemovalAction, retain: F) -> Sequence
where
    F: Fn(&Key) -> bool,
{
    item.iter()
        .filter_map(|(key, value)| match (retain(key), action) {
            (true, _) => Some((key.clone(), value.clone())),
            (false, RemovalAction::Nullify) => Some((key.clone(), Value::NULL)),
            (false, RemovalAction::Delete) => None,
        })
        .collect()
}

fn project_collection<F>(collection: &Sequence, project_item: F) -> Sequence
where
    F: Fn(&Sequence) -> Sequence,
{
    collection
        .iter()
        .map(|(key, entry)| {
            let projected = entry.as_sequence().map(&project_item).unwrap_or_default();
            (key.clone(), Value::Sequence(projected))
        })
        .collect()
}

/// Recursively strip every leading repetition of `prefix` from string keys:
/// with prefix `"_"`, `"__a"` becomes `"a"`. Keys that collide after
/// stripping keep the later value in the earlier position. An empty prefix
/// leaves keys untouched.
///
/// A multi-character prefix is stripped in whole repetitions: with prefix
/// `"ab"`, `"ababx"` becomes `"x"` while `"abbx"` becomes `"bx"`.
pub fn strip_key_prefix(value: &Value, prefix: &str) -> Value {
    let Value::Sequence(seq) = value else {
        return value.clone();
    };
    let stripped = seq
        .iter()
        .map(|(key, child)| {
            let key = match key {
                Key::Name(name) if !prefix.is_empty() => Key::parse(strip_repeated(name, prefix)),
                other => other.clone(),
            };
            (key, strip_key_prefix(child, prefix))
        })
        .collect();
    Value::Sequence(stripped)
}

fn strip_repeated<'a>(mut name: &'a str, prefix: &str) -> &'a str {
    while let Some(rest) = name.strip_prefix(prefix) {
        name = rest;
    }
    name
}
