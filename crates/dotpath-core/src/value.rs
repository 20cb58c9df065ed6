//! The dynamic value model shared by every transform.
//!
//! A [`Value`] is either a [`Scalar`] leaf or a [`Sequence`]: an ordered list of
//! values paired with an equally long list of [`Key`]s. There is no separate
//! mapping type. A sequence whose keys are exactly `0..n-1`, in that order, is
//! *positional* (list-like); any other sequence is *associative* (map-like).
//! The classification is decided on demand by [`Sequence::is_associative`], so
//! the same container can move between the two shapes as transforms rebuild it.
//!
//! Entries are stored as `Vec<(Key, Value)>` in insertion order. JSON interop
//! goes through `serde_json` with the `preserve_order` feature, so object key
//! order survives in both directions.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::error::Result;

// ============================================================================
// Key
// ============================================================================

/// A sequence key: a non-negative integer or a string.
///
/// Strings that are the canonical decimal spelling of a non-negative integer
/// (`"0"`, `"42"`) are normalized to [`Key::Index`] by [`Key::parse`]; `"01"`
/// and `"-1"` stay names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(u64),
    Name(String),
}

impl Key {
    /// Parse a string key, normalizing canonical integers to [`Key::Index`].
    pub fn parse(raw: &str) -> Key {
        if is_canonical_index(raw) {
            if let Ok(index) = raw.parse::<u64>() {
                return Key::Index(index);
            }
        }
        Key::Name(raw.to_string())
    }

    /// The integer index, if this is an index key.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }
}

fn is_canonical_index(raw: &str) -> bool {
    match raw.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        bytes => bytes.iter().all(u8::is_ascii_digit),
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(raw: &str) -> Self {
        Key::parse(raw)
    }
}

impl From<String> for Key {
    fn from(raw: String) -> Self {
        if is_canonical_index(&raw) {
            Key::parse(&raw)
        } else {
            Key::Name(raw)
        }
    }
}

impl From<&String> for Key {
    fn from(raw: &String) -> Self {
        Key::parse(raw)
    }
}

impl From<u64> for Key {
    fn from(index: u64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index as u64)
    }
}

// ============================================================================
// Scalar
// ============================================================================

/// A leaf value with no further structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Render the scalar the way composite keys and case-insensitive matching
    /// see it: null and false are empty, true is `"1"`, integral floats drop
    /// their fraction.
    pub fn render(&self) -> String {
        match self {
            Scalar::Null | Scalar::Bool(false) => String::new(),
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => render_float(*f),
            Scalar::String(s) => s.clone(),
        }
    }

    /// Loose truthiness: null, false, zero, `""` and `"0"` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::String(s) => !(s.is_empty() || s == "0"),
        }
    }

    /// Numeric view of the scalar, if it is a number or a numeric string.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::String(s) => parse_numeric(s),
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }
}

pub(crate) fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Parse a string as a number if it looks like one (surrounding whitespace
/// allowed, `inf`/`nan` spellings rejected).
pub(crate) fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let looks_numeric = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !looks_numeric {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

// ============================================================================
// Value
// ============================================================================

/// A node in a dynamic data tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Sequence),
}

impl Default for Value {
    fn default() -> Self {
        Value::NULL
    }
}

impl Value {
    pub const NULL: Value = Value::Scalar(Scalar::Null);

    /// An empty sequence.
    pub fn empty() -> Value {
        Value::Sequence(Sequence::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            Value::Scalar(_) => None,
        }
    }

    pub fn into_sequence(self) -> Option<Sequence> {
        match self {
            Value::Sequence(seq) => Some(seq),
            Value::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            Value::Sequence(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// A sequence with at least one entry. Collection operations treat any
    /// other entry as absent.
    pub fn as_non_empty_sequence(&self) -> Option<&Sequence> {
        self.as_sequence().filter(|seq| !seq.is_empty())
    }

    /// Loose truthiness: sequences are truthy when non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Scalar(scalar) => scalar.is_truthy(),
            Value::Sequence(seq) => !seq.is_empty(),
        }
    }

    /// String rendering used for composite keys. Sequences render as `"Array"`.
    pub fn render(&self) -> String {
        match self {
            Value::Scalar(scalar) => scalar.render(),
            Value::Sequence(_) => "Array".to_string(),
        }
    }

    /// Look up a direct child by key.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.as_sequence().and_then(|seq| seq.get(key))
    }

    /// Parse a JSON document into a value.
    pub fn from_json_str(json: &str) -> Result<Value> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Convert to a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }
}

// ============================================================================
// Sequence
// ============================================================================

/// An ordered, keyed container. Key order is significant.
///
/// Keyed lookups go through a `Key -> position` index kept beside the entry
/// list. `push` reads a cached next-free integer. Equality compares the
/// entries only.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    entries: Vec<(Key, Value)>,
    positions: HashMap<Key, usize>,
    next_index: u64,
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            next_index: 0,
        }
    }

    /// Build from explicit `(key, value)` pairs. A later pair with a key that
    /// is already present replaces the earlier value in place.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut seq = Sequence::new();
        for (key, value) in pairs {
            seq.insert(key.into(), value.into());
        }
        seq
    }

    /// Build a positional sequence keyed `0..n-1`.
    pub fn from_values<V, I>(values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter();
        let mut seq = Sequence::with_capacity(values.size_hint().0);
        for value in values {
            seq.push(value.into());
        }
        seq
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True iff the ordered key list is not exactly `[0, 1, ..., n-1]`.
    ///
    /// Order matters: keys `[1, 0]` are associative even though the key set
    /// is `{0, 1}`.
    pub fn is_associative(&self) -> bool {
        !self
            .entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| key.as_index() == Some(i as u64))
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.positions.get(key).map(|&at| &self.entries[at].1)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        let at = *self.positions.get(key)?;
        Some(&mut self.entries[at].1)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.positions.contains_key(key)
    }

    /// Set `key` to `value`. An existing key keeps its position and the
    /// previous value is returned; a new key is appended.
    pub fn insert(&mut self, key: Key, value: Value) -> Option<Value> {
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.append(key, value);
                None
            }
        }
    }

    /// Set `key` only if it is not present yet. Returns whether the value was
    /// stored.
    pub fn insert_if_absent(&mut self, key: Key, value: Value) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.append(key, value);
        true
    }

    /// Append under the next free integer key (one past the largest index
    /// key, or 0).
    pub fn push(&mut self, value: Value) {
        self.append(Key::Index(self.next_index), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Key, &Value)> + ExactSizeIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn first(&self) -> Option<(&Key, &Value)> {
        self.entries.first().map(|(k, v)| (k, v))
    }

    /// Drop the keys and renumber the values `0..n-1`.
    pub fn reindexed(self) -> Sequence {
        Sequence::from_values(self.entries.into_iter().map(|(_, v)| v))
    }

    /// The sequence stored under `key`, replacing any non-sequence value (or
    /// creating the key) with an empty sequence first.
    pub(crate) fn child_sequence_mut(&mut self, key: Key) -> &mut Sequence {
        let index = match self.positions.get(&key) {
            Some(&index) => {
                if !self.entries[index].1.is_sequence() {
                    self.entries[index].1 = Value::empty();
                }
                index
            }
            None => {
                self.append(key, Value::empty());
                self.entries.len() - 1
            }
        };
        match &mut self.entries[index].1 {
            Value::Sequence(seq) => seq,
            Value::Scalar(_) => unreachable!("slot was just set to a sequence"),
        }
    }

    /// Caller guarantees `key` is absent.
    fn append(&mut self, key: Key, value: Value) {
        if let Some(index) = key.as_index() {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }
}

impl FromIterator<(Key, Value)> for Sequence {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        for (key, value) in iter {
            seq.insert(key, value);
        }
        seq
    }
}

impl IntoIterator for Sequence {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = (&'a Key, &'a Value);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Key, Value)>,
        fn(&'a (Key, Value)) -> (&'a Key, &'a Value),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(split_entry as fn(&'a (Key, Value)) -> (&'a Key, &'a Value))
    }
}

fn split_entry(entry: &(Key, Value)) -> (&Key, &Value) {
    (&entry.0, &entry.1)
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<Sequence> for Value {
    fn from(seq: Sequence) -> Self {
        Value::Sequence(seq)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::NULL, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(Sequence::from_values(values))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::NULL,
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => Value::Scalar(number_to_scalar(&n)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(Sequence::from_values(items.into_iter().map(Value::from)))
            }
            serde_json::Value::Object(map) => Value::Sequence(
                map.into_iter()
                    .map(|(k, v)| (Key::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn number_to_scalar(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        // u64 beyond i64::MAX and all fractional numbers land here.
        Scalar::Float(n.as_f64().unwrap_or(0.0))
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            Value::Scalar(Scalar::Int(i)) => serde_json::Value::from(i),
            Value::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s),
            Value::Sequence(seq) if !seq.is_associative() => serde_json::Value::Array(
                seq.into_iter()
                    .map(|(_, v)| serde_json::Value::from(v))
                    .collect(),
            ),
            Value::Sequence(seq) => serde_json::Value::Object(
                seq.into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Serde
// ============================================================================

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Sequence(seq) => seq.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Scalar::Float(_) => serializer.serialize_unit(),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Positional sequences serialize as arrays, associative ones as maps with
/// string keys.
impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_associative() {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(&key.to_string(), value)?;
            }
            map.end()
        } else {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-like value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::NULL)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::NULL)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::from(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> std::result::Result<Value, E> {
        Ok(Value::from(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> std::result::Result<Value, E> {
        Ok(match i64::try_from(u) {
            Ok(i) => Value::from(i),
            Err(_) => Value::from(u as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::from(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Value, A::Error> {
        let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(value) = access.next_element::<Value>()? {
            values.push(value);
        }
        Ok(Value::Sequence(Sequence::from_values(values)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Value, A::Error> {
        let mut seq = Sequence::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            seq.insert(Key::from(key), value);
        }
        Ok(Value::Sequence(seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parse_normalizes_canonical_integers_only() {
        assert_eq!(Key::parse("0"), Key::Index(0));
        assert_eq!(Key::parse("42"), Key::Index(42));
        assert_eq!(Key::parse("042"), Key::Name("042".into()));
        assert_eq!(Key::parse("-1"), Key::Name("-1".into()));
        assert_eq!(Key::parse(""), Key::Name(String::new()));
        assert_eq!(Key::parse("1.5"), Key::Name("1.5".into()));
    }

    #[test]
    fn push_continues_after_largest_index() {
        let mut seq = Sequence::from_pairs([(Key::Index(4), "a"), (Key::parse("x"), "b")]);
        seq.push(Value::from("c"));
        assert_eq!(seq.get(&Key::Index(5)), Some(&Value::from("c")));
    }

    #[test]
    fn render_float_drops_integral_fraction() {
        assert_eq!(render_float(2.0), "2");
        assert_eq!(render_float(1.5), "1.5");
    }
}
