//! Usage normalization engine
//!
//! Turns the loosely-typed usage payloads of the OVH Public Cloud API into
//! flat, typed rows. Every projection is a pure function of one decoded
//! document.
//!
//! # Module Structure
//!
//! - [`numeric`] - Coerces mixed JSON number encodings into `f64`
//! - [`tree`] - Total accessors over generic JSON value trees
//! - [`catalog`] - Fixed usage categories and infrastructure resource types
//! - [`document`] - Usage documents (current, forecast, history)
//! - [`projections`] - Per-category detail, total and count views
//! - [`totals`] - Grand and comprehensive totals
//! - [`plans`] - Savings plan document and first-flavor extractors
//! - [`table`] - Column registry exposing every projection by name
//! - [`fetcher`] - Fetcher seam, endpoint paths, two-phase history fetch
//!
//! # Example
//!
//! ```ignore
//! use ovhusage::usage::{fetch_current, usage_table, UsageKind};
//!
//! async fn example(client: &ovhusage::ovh::client::OvhClient) -> anyhow::Result<()> {
//!     let doc = fetch_current(client, "my-project").await?;
//!     let row = usage_table(UsageKind::Current).project(&doc, &[])?;
//!     println!("{}", row["comprehensive_total_current_price"]);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod document;
pub mod fetcher;
pub mod numeric;
pub mod plans;
pub mod projections;
pub mod table;
pub mod totals;
pub mod tree;

pub use document::{HistoryListItem, UsageDocument, UsageKind};
pub use fetcher::{
    fetch_current, fetch_forecast, fetch_history, fetch_history_detail, fetch_plans, list_history,
    Fetcher, HistoryEntry, UsageEndpoint,
};
pub use plans::UsagePlanDocument;
pub use table::{plans_table, usage_table, ColumnDef, ColumnType, TableDef};
