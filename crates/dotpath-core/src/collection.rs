//! Per-entry collection helpers: pluck, map, sort, random pick and shuffle.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DotPathError;
use crate::path::{read, read_ref};
use crate::value::{Key, Scalar, Sequence, Value};

/// Read `path` from every entry. Entries that are not non-empty sequences
/// yield `null`, so the result has one slot per input entry under the same
/// key.
pub fn pluck(collection: &Sequence, path: &str) -> Sequence {
    collection
        .iter()
        .map(|(key, entry)| {
            let value = match entry.as_non_empty_sequence() {
                Some(_) => read(entry, path, None),
                None => Value::NULL,
            };
            (key.clone(), value)
        })
        .collect()
}

/// Map every entry with its key; the result is positional.
pub fn map_entries<F>(collection: &Sequence, mut f: F) -> Sequence
where
    F: FnMut(&Value, &Key) -> Value,
{
    Sequence::from_values(collection.iter().map(|(key, entry)| f(entry, key)))
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    /// The exact reverse of the ascending order, ties included.
    Descending,
}

/// How sort values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Numeric when both sides are numeric, otherwise by rendered string.
    #[default]
    Regular,
    /// Coerce both sides to numbers; non-numeric values count as zero.
    Numeric,
    /// Rendered strings, compared case-insensitively.
    StringCi,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Regular => "regular",
            SortMode::Numeric => "numeric",
            SortMode::StringCi => "string-ci",
        }
    }

    fn compare(self, a: &Value, b: &Value) -> Ordering {
        match self {
            SortMode::Regular => match (number_of(a), number_of(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => a.render().cmp(&b.render()),
            },
            SortMode::Numeric => {
                let x = coerce_number(a);
                let y = coerce_number(b);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            SortMode::StringCi => a.render().to_lowercase().cmp(&b.render().to_lowercase()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = DotPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "regular" => Ok(SortMode::Regular),
            "numeric" => Ok(SortMode::Numeric),
            "string-ci" => Ok(SortMode::StringCi),
            other => Err(DotPathError::invalid(format!(
                "'{other}' is not a valid sort mode. Must be one of regular, numeric, string-ci."
            ))),
        }
    }
}

fn number_of(value: &Value) -> Option<f64> {
    value.as_scalar().and_then(Scalar::as_number)
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Scalar(Scalar::Bool(b)) => f64::from(u8::from(*b)),
        other => number_of(other).unwrap_or(0.0),
    }
}

/// Sort entries by the value at `path`; the result is renumbered `0..n-1`.
pub fn sort_by_property(
    collection: &Sequence,
    path: &str,
    order: SortOrder,
    mode: SortMode,
) -> Sequence {
    sorted_entries(collection, path, order, mode).reindexed()
}

/// Sort entries by the value at `path`, keeping each entry's key.
pub fn asort_by_property(
    collection: &Sequence,
    path: &str,
    order: SortOrder,
    mode: SortMode,
) -> Sequence {
    sorted_entries(collection, path, order, mode)
}

fn sorted_entries(collection: &Sequence, path: &str, order: SortOrder, mode: SortMode) -> Sequence {
    let null = Value::NULL;
    let mut entries: Vec<(&Key, &Value, &Value)> = collection
        .iter()
        .map(|(key, entry)| (key, entry, read_ref(entry, path).unwrap_or(&null)))
        .collect();
    entries.sort_by(|a, b| mode.compare(a.2, b.2));
    if order == SortOrder::Descending {
        entries.reverse();
    }
    entries
        .into_iter()
        .map(|(key, entry, _)| (key.clone(), entry.clone()))
        .collect()
}

// ============================================================================
// Random selection
// ============================================================================

/// One uniformly chosen entry, or `None` for an empty collection.
pub fn random(collection: &Sequence) -> Option<&Value> {
    random_with_rng(collection, &mut rand::thread_rng())
}

/// [`random`] with a caller-supplied generator.
pub fn random_with_rng<'a, R: Rng + ?Sized>(collection: &'a Sequence, rng: &mut R) -> Option<&'a Value> {
    collection.values().choose(rng)
}

/// A new positional collection with the entries permuted, or `None` for an
/// empty collection. The input is left untouched.
pub fn shuffle(collection: &Sequence) -> Option<Sequence> {
    shuffle_with_rng(collection, &mut rand::thread_rng())
}

/// [`shuffle`] with a caller-supplied generator.
pub fn shuffle_with_rng<R: Rng + ?Sized>(collection: &Sequence, rng: &mut R) -> Option<Sequence> {
    if collection.is_empty() {
        return None;
    }
    let mut values: Vec<Value> = collection.values().cloned().collect();
    values.shuffle(rng);
    Some(Sequence::from_values(values))
}
