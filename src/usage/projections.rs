//! Per-category projections over a [`UsageDocument`].
//!
//! Each category gets three views: the raw detail array, the summed
//! `totalPrice`, and the entry count. Quantum and savings plans have their
//! own traversals because their billable arrays sit one level deeper.

use super::catalog::{
    HourlyCategory, ResourceType, PRICE_VALUE_FIELD, QUANTUM_KEY, QUANTUM_NOTEBOOK_KEY,
    RESOURCE_TYPE_FIELD, SAVINGS_PLAN_KEY, TOTAL_PRICE_FIELD,
};
use super::document::UsageDocument;
use super::numeric::to_float;
use super::tree::{
    as_entries, count, get_array_field, get_field, sum_field, sum_filtered_field, sum_nested_field,
};
use serde_json::Value;

/// Raw entries of an hourly category.
pub fn category_detail(doc: &UsageDocument, category: HourlyCategory) -> Option<&[Value]> {
    get_array_field(&doc.hourly_usage, category.api_key())
}

pub fn category_total(doc: &UsageDocument, category: HourlyCategory) -> f64 {
    sum_field(category_detail(doc, category), TOTAL_PRICE_FIELD)
}

pub fn category_count(doc: &UsageDocument, category: HourlyCategory) -> usize {
    count(category_detail(doc, category))
}

/// The quantum section as sent by the API (a record, not an array).
pub fn quantum_detail(doc: &UsageDocument) -> Option<&Value> {
    get_field(&doc.hourly_usage, QUANTUM_KEY)
}

/// Sum of `hourlyUsage.quantum.notebook[*].totalPrice`.
pub fn quantum_total(doc: &UsageDocument) -> f64 {
    let notebooks = quantum_detail(doc).and_then(|q| get_array_field(q, QUANTUM_NOTEBOOK_KEY));
    sum_field(notebooks, TOTAL_PRICE_FIELD)
}

pub fn savings_plan_detail(doc: &UsageDocument) -> Option<&[Value]> {
    get_array_field(&doc.monthly_usage, SAVINGS_PLAN_KEY)
}

/// Sum of `monthlyUsage.savingsPlan[*].totalPrice.value`.
pub fn savings_plan_total(doc: &UsageDocument) -> f64 {
    sum_nested_field(savings_plan_detail(doc), TOTAL_PRICE_FIELD, PRICE_VALUE_FIELD)
}

pub fn resources_detail(doc: &UsageDocument) -> Option<&[Value]> {
    as_entries(&doc.resources_usage)
}

/// Sum across every resource entry, whatever its type.
pub fn resources_total(doc: &UsageDocument) -> f64 {
    sum_field(resources_detail(doc), TOTAL_PRICE_FIELD)
}

pub fn resource_type_total(doc: &UsageDocument, resource: ResourceType) -> f64 {
    sum_filtered_field(
        resources_detail(doc),
        RESOURCE_TYPE_FIELD,
        resource.api_type(),
        TOTAL_PRICE_FIELD,
    )
}

/// `usableCredits.totalCredit`, `None` when the field is missing.
pub fn total_usable_credit(doc: &UsageDocument) -> Option<f64> {
    get_field(&doc.usable_credits, "totalCredit").map(to_float)
}

/// `period.from` / `period.to` as sent by the API.
pub fn period_bound<'a>(doc: &'a UsageDocument, bound: &str) -> Option<&'a str> {
    get_field(&doc.period, bound).and_then(Value::as_str)
}
