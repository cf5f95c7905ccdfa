//! Numeric Normalizer
//!
//! Usage payloads mix JSON number encodings: plain floats, integers and,
//! in a few quota fields, numbers sent as strings. Everything funnels through
//! [`to_float`] so aggregation stays total. Text fields and nested records
//! get the same treatment through [`lenient_string`] and
//! [`lenient_or_default`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce any decoded JSON value into an `f64`.
///
/// Numbers are returned as-is, strings are parsed as decimals. Anything else
/// (null, booleans, arrays, objects, malformed or non-finite strings) is `0.0`.
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_decimal(s).unwrap_or(0.0),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Serde adapter: accept any JSON value and coerce it with [`to_float`].
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_float(&value))
}

/// Serde adapter for integer fields. Fractional parts are truncated.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(i) = value.as_i64() {
        return Ok(i);
    }
    Ok(to_float(&value) as i64)
}

/// Text form of a scalar. Numbers and booleans are rendered, anything else
/// has no text form.
fn to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Serde adapter for text fields. Non-scalar values become the empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_text(value).unwrap_or_default())
}

/// Serde adapter for optional text fields. Non-scalar values become `None`.
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_text(value))
}

/// Serde adapter for nested records and lists: a value of the wrong shape
/// decodes as `T::default()` instead of failing the enclosing document.
pub fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
