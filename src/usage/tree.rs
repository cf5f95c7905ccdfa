//! Generic accessors over decoded JSON value trees.
//!
//! Every accessor is total: missing keys, wrong shapes and nulls produce the
//! identity of the aggregation (`0.0` for sums, `0` for counts, `None` for
//! lookups) rather than an error.

use super::numeric::to_float;
use serde_json::Value;

/// Borrow `value` as a slice of entries if it is array-shaped.
pub fn as_entries(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) => Some(items.as_slice()),
        _ => None,
    }
}

/// Look up `name` in a mapping and return it only if it is an array.
pub fn get_array_field<'a>(record: &'a Value, name: &str) -> Option<&'a [Value]> {
    match record {
        Value::Object(map) => map.get(name).and_then(as_entries),
        _ => None,
    }
}

/// Look up `name` in a mapping, whatever its shape.
pub fn get_field<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    match record {
        Value::Object(map) => map.get(name),
        _ => None,
    }
}

/// Sum `field` across mapping entries. Non-mapping entries and entries
/// without the field contribute nothing.
pub fn sum_field(entries: Option<&[Value]>, field: &str) -> f64 {
    entries
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| get_field(entry, field))
        .map(to_float)
        .sum()
}

/// Sum `entry[parent][child]` across entries. `parent` must be a mapping.
pub fn sum_nested_field(entries: Option<&[Value]>, parent: &str, child: &str) -> f64 {
    entries
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| get_field(entry, parent))
        .filter_map(|nested| get_field(nested, child))
        .map(to_float)
        .sum()
}

/// Sum `price_field` across entries whose `filter_field` is the string
/// `filter_value`.
pub fn sum_filtered_field(
    entries: Option<&[Value]>,
    filter_field: &str,
    filter_value: &str,
    price_field: &str,
) -> f64 {
    entries
        .unwrap_or_default()
        .iter()
        .filter(|entry| {
            matches!(get_field(entry, filter_field), Some(Value::String(s)) if s == filter_value)
        })
        .filter_map(|entry| get_field(entry, price_field))
        .map(to_float)
        .sum()
}

/// Number of entries, `0` when absent.
pub fn count(entries: Option<&[Value]>) -> usize {
    entries.map_or(0, <[Value]>::len)
}
