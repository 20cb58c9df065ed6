//! Recursive value mapping and casting foreign values into sequences.

use serde::Serialize;

use crate::error::{DotPathError, Result};
use crate::value::{Sequence, Value};

/// Apply `f` to every leaf below `value`, returning a new tree of the same
/// shape.
///
/// With `map_containers`, `f` is first applied to each nested sequence. If
/// the result is still a sequence the mapper descends into it; otherwise the
/// result is treated as a leaf and mapped again. The root itself is only
/// mapped when it is a scalar.
pub fn map_recursive<F>(value: &Value, mut f: F, map_containers: bool) -> Value
where
    F: FnMut(&Value) -> Value,
{
    match value {
        Value::Sequence(seq) => Value::Sequence(map_children(seq, &mut f, map_containers)),
        leaf => f(leaf),
    }
}

fn map_children<F>(seq: &Sequence, f: &mut F, map_containers: bool) -> Sequence
where
    F: FnMut(&Value) -> Value,
{
    seq.iter()
        .map(|(key, child)| {
            let mapped = match child {
                Value::Sequence(_) if map_containers => {
                    let replaced = f(child);
                    match replaced {
                        Value::Sequence(inner) => {
                            Value::Sequence(map_children(&inner, f, map_containers))
                        }
                        leaf => f(&leaf),
                    }
                }
                Value::Sequence(inner) => Value::Sequence(map_children(inner, f, map_containers)),
                leaf => f(leaf),
            };
            (key.clone(), mapped)
        })
        .collect()
}

// ============================================================================
// Casting
// ============================================================================

/// A value that may have a sequence representation.
pub trait Castable {
    /// The sequence form of this value, or `None` if it has none.
    fn to_sequence(&self) -> Option<Sequence>;
}

/// Dynamic values always cast: a sequence is itself, `null` is empty, any
/// other scalar becomes a one-element list.
impl Castable for Value {
    fn to_sequence(&self) -> Option<Sequence> {
        Some(match self {
            Value::Sequence(seq) => seq.clone(),
            Value::Scalar(_) if self.is_null() => Sequence::new(),
            scalar => Sequence::from_values([scalar.clone()]),
        })
    }
}

impl Castable for Sequence {
    fn to_sequence(&self) -> Option<Sequence> {
        Some(self.clone())
    }
}

impl Castable for serde_json::Value {
    fn to_sequence(&self) -> Option<Sequence> {
        Value::from(self.clone()).to_sequence()
    }
}

/// Cast `item` to a sequence, failing if it has no sequence form.
pub fn cast<T: Castable + ?Sized>(item: &T) -> Result<Sequence> {
    item.to_sequence().ok_or_else(|| {
        DotPathError::invalid(
            "Value must be a sequence or provide a sequence representation.",
        )
    })
}

/// Cast `item`, calling `fallback` when it has no sequence form. The
/// fallback must itself produce a sequence.
pub fn cast_with<T, F>(item: &T, fallback: F) -> Result<Sequence>
where
    T: Castable + ?Sized,
    F: FnOnce(&T) -> Value,
{
    if let Some(seq) = item.to_sequence() {
        return Ok(seq);
    }
    tracing::trace!("value has no sequence form, using fallback caster");
    fallback(item).into_sequence().ok_or_else(|| {
        DotPathError::invalid("Invalid fallback. Value returned from the cast fallback must be a sequence.")
    })
}

/// Cast any serializable value through its JSON form.
pub fn cast_serialize<T: Serialize + ?Sized>(item: &T) -> Result<Sequence> {
    let json = serde_json::to_value(item)?;
    cast(&json)
}

/// Cast every item of a slice; the result is positional.
pub fn cast_collection<T: Castable>(items: &[T]) -> Result<Sequence> {
    let cast_items = items
        .iter()
        .map(|item| cast(item).map(Value::Sequence))
        .collect::<Result<Vec<_>>>()?;
    Ok(Sequence::from_values(cast_items))
}

/// [`cast_collection`] with a fallback for items that have no sequence form.
pub fn cast_collection_with<T, F>(items: &[T], mut fallback: F) -> Result<Sequence>
where
    T: Castable,
    F: FnMut(&T) -> Value,
{
    let cast_items = items
        .iter()
        .map(|item| cast_with(item, &mut fallback).map(Value::Sequence))
        .collect::<Result<Vec<_>>>()?;
    Ok(Sequence::from_values(cast_items))
}
