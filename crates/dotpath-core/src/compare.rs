//! Value comparison disciplines used by the query engine.
//!
//! - [`MatchType::Loose`] -- value equality with dynamic coercion (`1 == "1"`,
//!   `null == false`)
//! - [`MatchType::Strict`] -- equal variant and equal value (`1 != "1"`,
//!   `1 != 1.0`)
//! - [`MatchType::CaseInsensitive`] -- both sides rendered to strings,
//!   lowercased, then compared loosely

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DotPathError;
use crate::value::{parse_numeric, Scalar, Value};

/// How an entry's value is compared against an expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    #[default]
    Loose,
    Strict,
    #[serde(rename = "ci", alias = "case-insensitive")]
    CaseInsensitive,
}

impl MatchType {
    /// Compare `actual` against `expected` under this discipline.
    pub fn matches(self, actual: &Value, expected: &Value) -> bool {
        match self {
            MatchType::Loose => loose_eq(actual, expected),
            MatchType::Strict => strict_eq(actual, expected),
            MatchType::CaseInsensitive => case_insensitive_eq(actual, expected),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Loose => "loose",
            MatchType::Strict => "strict",
            MatchType::CaseInsensitive => "ci",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = DotPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "loose" => Ok(MatchType::Loose),
            "strict" => Ok(MatchType::Strict),
            "ci" | "case-insensitive" => Ok(MatchType::CaseInsensitive),
            other => {
                tracing::debug!(match_type = other, "rejected match type");
                Err(DotPathError::invalid(format!(
                    "'{other}' is not a valid match type. Must be one of loose, strict, ci."
                )))
            }
        }
    }
}

/// Loose equality.
///
/// Sequences are equal when they hold the same keys with loosely equal
/// values, regardless of key order.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Sequence(x), Value::Sequence(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| loose_eq(v, w)))
        }
        (Value::Scalar(Scalar::Null), other) | (other, Value::Scalar(Scalar::Null)) => {
            match other {
                Value::Scalar(Scalar::String(s)) => s.is_empty(),
                _ => !other.is_truthy(),
            }
        }
        (Value::Scalar(Scalar::Bool(flag)), other) | (other, Value::Scalar(Scalar::Bool(flag))) => {
            *flag == other.is_truthy()
        }
        (Value::Scalar(x), Value::Scalar(y)) => scalar_loose_eq(x, y),
        _ => false,
    }
}

fn scalar_loose_eq(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => x == y,
        (Scalar::String(x), Scalar::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(nx), Some(ny)) => nx == ny,
            _ => x == y,
        },
        (number, Scalar::String(s)) | (Scalar::String(s), number) => match parse_numeric(s) {
            Some(n) => number.as_number() == Some(n),
            None => number.render() == *s,
        },
        (x, y) => match (x.as_number(), y.as_number()) {
            (Some(nx), Some(ny)) => nx == ny,
            _ => false,
        },
    }
}

/// Strict equality: same variant, same value, and for sequences the same
/// keys in the same order.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Case-insensitive equality on rendered strings. Sequences have no string
/// rendering worth comparing and fall back to [`loose_eq`].
pub fn case_insensitive_eq(a: &Value, b: &Value) -> bool {
    if a.is_sequence() || b.is_sequence() {
        return loose_eq(a, b);
    }
    let left = Value::from(a.render().to_lowercase());
    let right = Value::from(b.render().to_lowercase());
    loose_eq(&left, &right)
}
