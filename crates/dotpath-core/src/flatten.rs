//! Flatten nested sequences into delimiter-joined keys, and inflate them back.
//!
//! ```text
//! {"a": {"aa": "x", "bb": {"aaa": "y"}}}   <->   {"a.aa": "x", "a.bb.aaa": "y"}
//! ```
//!
//! Only associative sequences are folded into joined keys. Positional
//! sequences keep their list shape; their sequence elements are flattened
//! individually, one level deeper than the list itself.
//!
//! Both directions take a [`Levels`] bound. Zero levels is the identity.

use crate::value::{Key, Sequence, Value};

/// Delimiter used when none is given.
pub const DEFAULT_DELIMITER: &str = ".";

/// Segment cap applied by [`inflate`] when levels are unlimited.
pub const INFLATE_LEVEL_CAP: usize = 1000;

/// Recursion depth bound for [`flatten`] and [`inflate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Levels {
    #[default]
    Unlimited,
    Exactly(u32),
}

impl Levels {
    pub fn is_zero(self) -> bool {
        self == Levels::Exactly(0)
    }

    /// Consume one level.
    ///
    /// A count that is decremented past zero never reaches zero again, so
    /// `Exactly(0)` decrements to `Unlimited`. Flatten relies on this when a
    /// positional list is met with no levels left.
    pub fn decrement(self) -> Levels {
        match self {
            Levels::Unlimited | Levels::Exactly(0) => Levels::Unlimited,
            Levels::Exactly(n) => Levels::Exactly(n - 1),
        }
    }

    fn segment_cap(self) -> usize {
        match self {
            Levels::Unlimited => INFLATE_LEVEL_CAP,
            Levels::Exactly(n) => n as usize,
        }
    }
}

impl From<u32> for Levels {
    fn from(n: u32) -> Self {
        Levels::Exactly(n)
    }
}

impl From<Option<u32>> for Levels {
    fn from(n: Option<u32>) -> Self {
        n.map_or(Levels::Unlimited, Levels::Exactly)
    }
}

/// Negative counts mean unlimited.
impl From<i64> for Levels {
    fn from(n: i64) -> Self {
        u32::try_from(n).map_or(Levels::Unlimited, Levels::Exactly)
    }
}

// ============================================================================
// Flatten
// ============================================================================

/// Flatten `node`, joining associative keys with `delimiter`.
///
/// Scalars are returned unchanged, as is anything flattened with zero levels.
///
/// # Examples
///
/// ```
/// use dotpath_core::{flatten, Levels, Value};
/// use serde_json::json;
///
/// let nested = Value::from(json!({"a": {"b": {"c": 1}}, "list": [{"x": {"y": 2}}]}));
/// let flat = flatten(&nested, ".", Levels::Unlimited);
/// assert_eq!(flat, Value::from(json!({"a.b.c": 1, "list": [{"x.y": 2}]})));
/// ```
pub fn flatten(node: &Value, delimiter: &str, levels: Levels) -> Value {
    match node {
        Value::Sequence(seq) => Value::Sequence(flatten_sequence(seq, delimiter, levels)),
        scalar => scalar.clone(),
    }
}

/// [`flatten`] for a value already known to be a sequence.
pub fn flatten_sequence(seq: &Sequence, delimiter: &str, levels: Levels) -> Sequence {
    if levels.is_zero() {
        return seq.clone();
    }
    let remaining = levels.decrement();

    let mut out = Sequence::with_capacity(seq.len());
    for (key, value) in seq {
        match value {
            Value::Sequence(child) if child.is_empty() => {
                out.insert(key.clone(), Value::empty());
            }
            Value::Sequence(child) if !child.is_associative() => {
                let items = child
                    .values()
                    .map(|item| flatten(item, delimiter, remaining.decrement()));
                out.insert(key.clone(), Value::Sequence(Sequence::from_values(items)));
            }
            Value::Sequence(child) => {
                for (subkey, subvalue) in flatten_sequence(child, delimiter, remaining) {
                    out.insert(Key::from(format!("{key}{delimiter}{subkey}")), subvalue);
                }
            }
            scalar => {
                out.insert(key.clone(), scalar.clone());
            }
        }
    }
    out
}

// ============================================================================
// Inflate
// ============================================================================

/// Inflate a flat mapping, splitting each key on `delimiter` into a nesting
/// path.
///
/// With a level cap, keys that split into more segments than the cap keep the
/// first `levels` segments as the path and rejoin the rest as the leaf key.
/// When two keys land on the same leaf, the first one wins.
///
/// # Examples
///
/// ```
/// use dotpath_core::{inflate, Levels, Value};
/// use serde_json::json;
///
/// let flat = Value::from(json!({"a.aa": "x", "a.bb.aaa": "y"}));
/// assert_eq!(
///     inflate(&flat, ".", Levels::Exactly(1)),
///     Value::from(json!({"a": {"aa": "x", "bb.aaa": "y"}}))
/// );
/// ```
pub fn inflate(flat: &Value, delimiter: &str, levels: Levels) -> Value {
    match flat {
        Value::Sequence(seq) => Value::Sequence(inflate_sequence(seq, delimiter, levels)),
        scalar => scalar.clone(),
    }
}

/// [`inflate`] for a value already known to be a sequence.
pub fn inflate_sequence(flat: &Sequence, delimiter: &str, levels: Levels) -> Sequence {
    if levels.is_zero() {
        return flat.clone();
    }
    let cap = levels.segment_cap();

    let mut out = Sequence::new();
    for (key, value) in flat {
        let raw = key.to_string();
        let parts = split_key(&raw, delimiter);
        let (path, leaf) = if parts.len() > cap {
            (&parts[..cap], parts[cap..].join(delimiter))
        } else {
            let (last, path) = parts
                .split_last()
                .map_or((raw.as_str(), &parts[..0]), |(last, path)| (*last, path));
            (path, last.to_string())
        };

        let mut parent = &mut out;
        for part in path {
            parent = parent.child_sequence_mut(Key::parse(part));
        }
        if !parent.insert_if_absent(Key::from(leaf), value.clone()) {
            tracing::trace!(key = %raw, "inflate collision, keeping first value");
        }
    }
    out
}

fn split_key<'a>(raw: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        vec![raw]
    } else {
        raw.split(delimiter).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_passes_through_zero_to_unlimited() {
        assert_eq!(Levels::Exactly(2).decrement(), Levels::Exactly(1));
        assert_eq!(Levels::Exactly(0).decrement(), Levels::Unlimited);
        assert_eq!(Levels::Unlimited.decrement(), Levels::Unlimited);
    }

    #[test]
    fn negative_counts_are_unlimited() {
        assert_eq!(Levels::from(-1i64), Levels::Unlimited);
        assert_eq!(Levels::from(3i64), Levels::Exactly(3));
    }

    #[test]
    fn empty_delimiter_keeps_key_whole() {
        assert_eq!(split_key("a.b", ""), vec!["a.b"]);
    }
}
