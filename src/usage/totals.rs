//! Grand-total aggregators.
//!
//! The same formulas serve current, forecast and history documents.

use super::catalog::HourlyCategory;
use super::document::UsageDocument;
use super::projections::{category_total, quantum_total, resources_total, savings_plan_total};

/// Sum of the eight fixed hourly categories plus quantum notebooks.
///
/// Categories outside [`HourlyCategory::ALL`] are ignored even when present
/// in the payload.
pub fn hourly_grand_total(doc: &UsageDocument) -> f64 {
    let standard: f64 = HourlyCategory::ALL
        .iter()
        .map(|category| category_total(doc, *category))
        .sum();
    standard + quantum_total(doc)
}

/// Hourly grand total + monthly savings plans + infrastructure resources.
///
/// A sub-total that is not a finite number contributes zero, so one broken
/// section never poisons the row.
pub fn comprehensive_total(doc: &UsageDocument) -> f64 {
    [
        hourly_grand_total(doc),
        savings_plan_total(doc),
        resources_total(doc),
    ]
    .into_iter()
    .map(finite_or_zero)
    .sum()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!("Discarding non-finite sub-total: {}", value);
        0.0
    }
}
