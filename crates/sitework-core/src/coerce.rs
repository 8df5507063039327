//! Lenient numeric coercion for values arriving from the API layer.
//!
//! Contract and variation fields show up as JSON numbers, numeric strings
//! with stray formatting ("1,050,000", "SAR 350000.50"), empty strings or
//! nulls. Every one of them goes through [`number`] so that "no data yet"
//! and "zero" behave the same. Nothing in this module fails.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a finite float.
///
/// Numbers pass through, strings go through [`parse_lenient`], and
/// everything else (null, booleans, arrays, objects) becomes `0`.
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => finite_or_zero(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => parse_lenient(s),
        _ => 0.0,
    }
}

/// Parse a numeric string after stripping everything except ASCII digits,
/// `.`, `+` and `-`.
///
/// The remainder must parse as a whole ("1.2.3" and "5-" give `0`), and an
/// empty remainder is `0`.
pub fn parse_lenient(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Round to the nearest whole currency unit, halves toward positive infinity.
///
/// `2.5 → 3`, `-2.5 → -2`. Non-finite input gives `0`, and negative zero is
/// normalised so it never leaks into serialized output.
pub fn round(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let floor = v.floor();
    let rounded = if v - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// [`number`] followed by [`round`].
pub fn round_value(value: &Value) -> f64 {
    round(number(value))
}

/// Interpret a boolean-like flag: `true`, `1`, or one of the strings
/// `"true"`, `"yes"`, `"1"` (case-insensitive, trimmed).
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v == 1.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        _ => false,
    }
}

/// Read a record identifier. Only whole non-negative numbers qualify; a
/// nested object is looked up by its `id` key, one level deep.
pub fn identifier(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Object(map) => match map.get("id") {
            Some(inner @ (Value::Number(_) | Value::String(_))) => identifier(inner),
            _ => None,
        },
        _ => None,
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Serde helpers that route struct fields through the coercion rules.
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub mod lenient {
    use super::*;

    /// Any JSON value → `f64` via [`number`](super::number).
    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(number(&value))
    }

    /// Like [`amount`] but keeps absence apart from zero: `null` and `""`
    /// become `None`.
    pub fn opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            other => Some(number(other)),
        })
    }

    /// Boolean-like flag via [`truthy`](super::truthy).
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(truthy(&value))
    }

    /// Record identifier: a non-negative integer, an integer string, or a
    /// nested `{"id": n}` object. Anything else (UUIDs, fractions) is `None`.
    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(super::identifier(&value))
    }

    /// Free text that may arrive as null or a number.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
