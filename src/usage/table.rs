//! Table registry
//!
//! Every output column is an independent projection of one decoded document,
//! so a caller asking for a subset of columns only pays for those.

use super::catalog::{HourlyCategory, ResourceType};
use super::document::{UsageDocument, UsageKind};
use super::plans::UsagePlanDocument;
use super::projections::{
    category_count, category_detail, category_total, period_bound, quantum_detail, quantum_total,
    resource_type_total, resources_detail, resources_total, savings_plan_detail,
    savings_plan_total, total_usable_credit,
};
use super::totals::{comprehensive_total, hourly_grand_total};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

/// Output type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int,
    Double,
    Timestamp,
    Json,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Int => "int",
            ColumnType::Double => "double",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
        }
    }
}

type Extract<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

/// Column definition
pub struct ColumnDef<T> {
    pub name: String,
    pub column_type: ColumnType,
    pub description: String,
    extract: Extract<T>,
}

impl<T> ColumnDef<T> {
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        description: impl Into<String>,
        extract: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            description: description.into(),
            extract: Box::new(extract),
        }
    }

    pub fn extract(&self, item: &T) -> Value {
        (self.extract)(item)
    }
}

/// Table definition
pub struct TableDef<T> {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: Vec<ColumnDef<T>>,
}

impl<T> TableDef<T> {
    pub fn column(&self, name: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Project `item` onto the requested columns, or every column when
    /// `requested` is empty.
    pub fn project(&self, item: &T, requested: &[String]) -> Result<Map<String, Value>> {
        let mut row = Map::new();

        if requested.is_empty() {
            for column in &self.columns {
                row.insert(column.name.clone(), column.extract(item));
            }
            return Ok(row);
        }

        for name in requested {
            let Some(column) = self.column(name) else {
                return Err(anyhow::anyhow!(
                    "Unknown column '{}' for table {}",
                    name,
                    self.name
                ));
            };
            row.insert(column.name.clone(), column.extract(item));
        }

        Ok(row)
    }
}

// =============================================================================
// Value helpers
// =============================================================================

fn opt_f64(value: Option<f64>) -> Value {
    value.map_or(Value::Null, |v| json!(v))
}

fn opt_i64(value: Option<i64>) -> Value {
    value.map_or(Value::Null, |v| json!(v))
}

fn opt_str(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

fn opt_entries(value: Option<&[Value]>) -> Value {
    value.map_or(Value::Null, |v| Value::Array(v.to_vec()))
}

/// Normalize an API timestamp to RFC 3339 UTC. Unparseable input is null.
pub fn timestamp_value(raw: Option<&str>) -> Value {
    raw.and_then(parse_timestamp)
        .map_or(Value::Null, |ts| Value::String(ts.to_rfc3339()))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Usage tables (current / forecast / history)
// =============================================================================

/// Build the column set for one usage document kind.
pub fn usage_columns(kind: UsageKind) -> Vec<ColumnDef<UsageDocument>> {
    let detail = kind.detail_suffix();
    let label = kind.total_label();
    let mut columns = vec![ColumnDef::new(
        "project_id",
        ColumnType::String,
        "The project ID.",
        |d: &UsageDocument| Value::String(d.project_id.clone()),
    )];

    if kind == UsageKind::History {
        columns.push(ColumnDef::new(
            "usage_id",
            ColumnType::String,
            "Usage history record ID.",
            |d: &UsageDocument| Value::String(d.id.clone()),
        ));
    }

    columns.push(ColumnDef::new(
        "last_update",
        ColumnType::Timestamp,
        "Last update timestamp of the usage data.",
        |d: &UsageDocument| timestamp_value(d.last_update.as_deref()),
    ));

    for category in HourlyCategory::ALL {
        let stem = category.column_stem();
        let name = category.display_name();
        columns.push(ColumnDef::new(
            format!("{stem}_{detail}"),
            ColumnType::Json,
            format!("Detailed {name} {label} data."),
            move |d: &UsageDocument| opt_entries(category_detail(d, category)),
        ));
        columns.push(ColumnDef::new(
            format!("total_{stem}_price"),
            ColumnType::Double,
            format!("Total {label} price for {name}."),
            move |d: &UsageDocument| json!(category_total(d, category)),
        ));
        columns.push(ColumnDef::new(
            format!("{stem}_count"),
            ColumnType::Int,
            format!("Number of {name} entries."),
            move |d: &UsageDocument| json!(category_count(d, category)),
        ));
    }

    columns.push(ColumnDef::new(
        format!("quantum_{detail}"),
        ColumnType::Json,
        "Quantum/AI notebook usage (nested structure).",
        |d: &UsageDocument| quantum_detail(d).cloned().unwrap_or(Value::Null),
    ));
    columns.push(ColumnDef::new(
        "total_quantum_price",
        ColumnType::Double,
        format!("Total {label} price for quantum/AI notebooks."),
        |d: &UsageDocument| json!(quantum_total(d)),
    ));
    columns.push(ColumnDef::new(
        format!("grand_total_{label}_price"),
        ColumnType::Double,
        "Sum of every hourly category plus quantum notebooks.",
        |d: &UsageDocument| json!(hourly_grand_total(d)),
    ));
    columns.push(ColumnDef::new(
        "hourly_usage",
        ColumnType::Json,
        "Complete raw hourly usage structure.",
        |d: &UsageDocument| d.hourly_usage.clone(),
    ));
    columns.push(ColumnDef::new(
        "monthly_usage",
        ColumnType::Json,
        "Monthly usage including savings plans.",
        |d: &UsageDocument| d.monthly_usage.clone(),
    ));
    columns.push(ColumnDef::new(
        format!("monthly_savings_plan_{detail}"),
        ColumnType::Json,
        "Savings plan monthly entries with pricing.",
        |d: &UsageDocument| opt_entries(savings_plan_detail(d)),
    ));
    columns.push(ColumnDef::new(
        "total_monthly_savings_plan_price",
        ColumnType::Double,
        format!("Total {label} price for monthly savings plans."),
        |d: &UsageDocument| json!(savings_plan_total(d)),
    ));
    columns.push(ColumnDef::new(
        kind.resources_column(),
        ColumnType::Json,
        "Infrastructure resources usage (gateways, load balancers, IPs).",
        |d: &UsageDocument| opt_entries(resources_detail(d)),
    ));
    columns.push(ColumnDef::new(
        "total_resources_price",
        ColumnType::Double,
        format!("Total {label} price for infrastructure resources."),
        |d: &UsageDocument| json!(resources_total(d)),
    ));

    for resource in ResourceType::ALL {
        columns.push(ColumnDef::new(
            format!("{}_{label}_price", resource.column_stem()),
            ColumnType::Double,
            format!("{} price for {} resources.", capitalize(label), resource.display_name()),
            move |d: &UsageDocument| json!(resource_type_total(d, resource)),
        ));
    }

    let period = kind.period_prefix();
    columns.push(ColumnDef::new(
        period,
        ColumnType::Json,
        "Period with from/to dates.",
        |d: &UsageDocument| d.period.clone(),
    ));
    columns.push(ColumnDef::new(
        format!("{period}_from"),
        ColumnType::Timestamp,
        "Start of the period.",
        |d: &UsageDocument| timestamp_value(period_bound(d, "from")),
    ));
    columns.push(ColumnDef::new(
        format!("{period}_to"),
        ColumnType::Timestamp,
        "End of the period.",
        |d: &UsageDocument| timestamp_value(period_bound(d, "to")),
    ));
    columns.push(ColumnDef::new(
        "usable_credits",
        ColumnType::Json,
        "Credits that can be applied to this usage.",
        |d: &UsageDocument| d.usable_credits.clone(),
    ));
    columns.push(ColumnDef::new(
        "total_usable_credit",
        ColumnType::Double,
        "Total amount of usable credits.",
        |d: &UsageDocument| opt_f64(total_usable_credit(d)),
    ));
    columns.push(ColumnDef::new(
        format!("comprehensive_total_{label}_price"),
        ColumnType::Double,
        "Grand total of hourly, monthly and resources costs.",
        |d: &UsageDocument| json!(comprehensive_total(d)),
    ));

    columns
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static CURRENT: OnceLock<TableDef<UsageDocument>> = OnceLock::new();
static FORECAST: OnceLock<TableDef<UsageDocument>> = OnceLock::new();
static HISTORY: OnceLock<TableDef<UsageDocument>> = OnceLock::new();
static PLANS: OnceLock<TableDef<UsagePlanDocument>> = OnceLock::new();

/// Table for a usage document kind (built on first access).
pub fn usage_table(kind: UsageKind) -> &'static TableDef<UsageDocument> {
    let (cell, name, description) = match kind {
        UsageKind::Current => (
            &CURRENT,
            "ovh_cloud_project_usage_current",
            "Current usage of a Public Cloud project with per-category price breakdown.",
        ),
        UsageKind::Forecast => (
            &FORECAST,
            "ovh_cloud_project_usage_forecast",
            "Forecasted usage of a Public Cloud project until the end of the billing period.",
        ),
        UsageKind::History => (
            &HISTORY,
            "ovh_cloud_project_usage_history",
            "Usage of a Public Cloud project for past billing periods.",
        ),
    };

    cell.get_or_init(|| TableDef {
        name,
        description,
        columns: usage_columns(kind),
    })
}

// =============================================================================
// Plans table
// =============================================================================

fn plan_columns() -> Vec<ColumnDef<UsagePlanDocument>> {
    type P = UsagePlanDocument;
    vec![
        ColumnDef::new("project_id", ColumnType::String, "Public Cloud project ID.", |d: &P| {
            Value::String(d.project_id.clone())
        }),
        ColumnDef::new("period_from", ColumnType::Timestamp, "Start of the usage period.", |d: &P| {
            timestamp_value(d.period.from.as_deref())
        }),
        ColumnDef::new("period_to", ColumnType::Timestamp, "End of the usage period.", |d: &P| {
            timestamp_value(d.period.to.as_deref())
        }),
        ColumnDef::new(
            "total_savings",
            ColumnType::Double,
            "Total amount saved by savings plans.",
            |d: &P| json!(d.total_savings.value),
        ),
        ColumnDef::new(
            "total_savings_currency",
            ColumnType::String,
            "Currency of total savings.",
            |d: &P| Value::String(d.total_savings.currency_code.clone()),
        ),
        ColumnDef::new(
            "total_savings_text",
            ColumnType::String,
            "Human-readable total savings.",
            |d: &P| Value::String(d.total_savings.text.clone()),
        ),
        ColumnDef::new("flavor", ColumnType::String, "Instance flavor (e.g. b3-16).", |d: &P| {
            opt_str(d.flavor_name())
        }),
        ColumnDef::new(
            "flat_fee_total_price",
            ColumnType::Double,
            "Total flat fee price for the flavor.",
            |d: &P| opt_f64(d.flat_fee_total_price()),
        ),
        ColumnDef::new(
            "flat_fee_currency",
            ColumnType::String,
            "Currency of the flat fee.",
            |d: &P| opt_str(d.flat_fee_currency()),
        ),
        ColumnDef::new(
            "over_quota_quantity",
            ColumnType::Int,
            "Quantity of over-quota usage.",
            |d: &P| opt_i64(d.over_quota_quantity()),
        ),
        ColumnDef::new(
            "over_quota_unit_price",
            ColumnType::Double,
            "Unit price of over-quota usage.",
            |d: &P| opt_f64(d.over_quota_unit_price()),
        ),
        ColumnDef::new(
            "flavor_total_price",
            ColumnType::Double,
            "Total price for the flavor.",
            |d: &P| opt_f64(d.flavor_total_price()),
        ),
        ColumnDef::new(
            "flavor_saved_amount",
            ColumnType::Double,
            "Amount saved for the flavor.",
            |d: &P| opt_f64(d.flavor_saved_amount()),
        ),
        ColumnDef::new(
            "usage_period_coverage",
            ColumnType::String,
            "Coverage percentage of the period.",
            |d: &P| opt_str(d.coverage()),
        ),
        ColumnDef::new(
            "usage_period_utilization",
            ColumnType::String,
            "Utilization percentage of the period.",
            |d: &P| opt_str(d.utilization()),
        ),
        ColumnDef::new(
            "consumption_size",
            ColumnType::Int,
            "Number of instances consumed.",
            |d: &P| opt_i64(d.consumption_size()),
        ),
        ColumnDef::new("cumul_plan_size", ColumnType::Int, "Cumulative plan size.", |d: &P| {
            opt_i64(d.cumul_plan_size())
        }),
        ColumnDef::new(
            "subscription_id",
            ColumnType::String,
            "Savings plan subscription ID.",
            |d: &P| opt_str(d.subscription_id()),
        ),
        ColumnDef::new(
            "subscription_size",
            ColumnType::Int,
            "Savings plan subscription size.",
            |d: &P| opt_i64(d.subscription_size()),
        ),
        ColumnDef::new("subscription_begin", ColumnType::Timestamp, "Subscription start.", |d: &P| {
            timestamp_value(d.subscription_begin())
        }),
        ColumnDef::new("subscription_end", ColumnType::Timestamp, "Subscription end.", |d: &P| {
            timestamp_value(d.subscription_end())
        }),
        ColumnDef::new("plan_name", ColumnType::String, "Savings plan name.", |d: &P| {
            opt_str(d.plan_name())
        }),
        ColumnDef::new("flavors", ColumnType::Json, "Complete flavors data.", |d: &P| {
            serde_json::to_value(&d.flavors).unwrap_or(Value::Null)
        }),
    ]
}

pub fn plans_table() -> &'static TableDef<UsagePlanDocument> {
    PLANS.get_or_init(|| TableDef {
        name: "ovh_cloud_project_usage_plans",
        description: "Savings plan usage and cost information for a Public Cloud project.",
        columns: plan_columns(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn doc(value: Value) -> UsageDocument {
        UsageDocument::from_value(value, "proj-1").unwrap()
    }

    #[test]
    fn test_column_names_unique_per_table() {
        for kind in [UsageKind::Current, UsageKind::Forecast, UsageKind::History] {
            let table = usage_table(kind);
            let names: HashSet<_> = table.column_names().into_iter().collect();
            assert_eq!(names.len(), table.columns.len(), "duplicate in {}", table.name);
        }
        let names: HashSet<_> = plans_table().column_names().into_iter().collect();
        assert_eq!(names.len(), plans_table().columns.len());
    }

    #[test]
    fn test_kind_specific_names() {
        let current = usage_table(UsageKind::Current);
        assert!(current.column("volumes_usage").is_some());
        assert!(current.column("grand_total_current_price").is_some());
        assert!(current.column("comprehensive_total_current_price").is_some());
        assert!(current.column("usage_id").is_none());

        let forecast = usage_table(UsageKind::Forecast);
        assert!(forecast.column("volumes_forecast").is_some());
        assert!(forecast.column("resources_usage_forecast").is_some());
        assert!(forecast.column("forecast_period_from").is_some());
        assert!(forecast.column("gateway_forecast_price").is_some());

        let history = usage_table(UsageKind::History);
        assert!(history.column("usage_id").is_some());
        assert!(history.column("loadbalancer_historical_price").is_some());
        assert!(history.column("grand_total_historical_price").is_some());
    }

    #[test]
    fn test_project_current_row() {
        let d = doc(json!({
            "hourlyUsage": {
                "volume": [{"totalPrice": 10.0}, {"totalPrice": 5.5}],
                "instance": [{"totalPrice": 100}]
            }
        }));
        let row = usage_table(UsageKind::Current).project(&d, &[]).unwrap();

        assert_eq!(row["project_id"], "proj-1");
        assert_eq!(row["total_volumes_price"], json!(15.5));
        assert_eq!(row["volumes_count"], json!(2));
        assert_eq!(row["total_instances_price"], json!(100.0));
        assert_eq!(row["grand_total_current_price"], json!(115.5));
        assert_eq!(row["comprehensive_total_current_price"], json!(115.5));
        assert_eq!(row["snapshots_usage"], Value::Null);
        assert_eq!(row["total_usable_credit"], Value::Null);
        assert_eq!(row["last_update"], Value::Null);
    }

    #[test]
    fn test_project_resources_row() {
        let d = doc(json!({
            "resourcesUsage": [
                {"type": "gateway", "totalPrice": 3.0},
                {"type": "floatingip", "totalPrice": 1.2},
                {"type": "gateway", "totalPrice": 2.0}
            ]
        }));
        let requested = vec![
            "gateway_current_price".to_string(),
            "floatingip_current_price".to_string(),
            "total_resources_price".to_string(),
        ];
        let row = usage_table(UsageKind::Current).project(&d, &requested).unwrap();

        assert_eq!(row.len(), 3);
        assert_eq!(row["gateway_current_price"], json!(5.0));
        assert_eq!(row["floatingip_current_price"], json!(1.2));
        let total = row["total_resources_price"].as_f64().unwrap();
        assert!((total - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_row_keys_keep_column_order() {
        let d = doc(json!({}));
        let requested = vec![
            "total_resources_price".to_string(),
            "project_id".to_string(),
            "last_update".to_string(),
        ];
        let row = usage_table(UsageKind::Current).project(&d, &requested).unwrap();
        let keys: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["total_resources_price", "project_id", "last_update"]);

        let table = plans_table();
        let row = table.project(&UsagePlanDocument::default(), &[]).unwrap();
        let keys: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, table.column_names());
    }

    #[test]
    fn test_unknown_column_is_error() {
        let d = UsageDocument::default();
        let err = usage_table(UsageKind::Forecast)
            .project(&d, &["volumes_usage".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown column 'volumes_usage'"));
    }

    #[test]
    fn test_timestamp_normalization() {
        assert_eq!(
            timestamp_value(Some("2025-11-04T10:00:00+01:00")),
            json!("2025-11-04T09:00:00+00:00")
        );
        assert_eq!(
            timestamp_value(Some("2025-06-01")),
            json!("2025-06-01T00:00:00+00:00")
        );
        assert_eq!(timestamp_value(Some("yesterday")), Value::Null);
        assert_eq!(timestamp_value(None), Value::Null);
    }

    #[test]
    fn test_plans_row_with_empty_flavors() {
        let d = UsagePlanDocument::from_value(json!({"flavors": []}), "proj-1").unwrap();
        let row = plans_table().project(&d, &[]).unwrap();

        assert_eq!(row["project_id"], "proj-1");
        for name in [
            "flavor",
            "flat_fee_total_price",
            "over_quota_quantity",
            "usage_period_coverage",
            "subscription_id",
            "subscription_begin",
            "plan_name",
        ] {
            assert_eq!(row[name], Value::Null, "{name} should be null");
        }
        assert_eq!(row["flavors"], json!([]));
    }
}
