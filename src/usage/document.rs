//! Usage documents returned by the current, forecast and history endpoints.

use super::numeric::{lenient_opt_string, lenient_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One decoded usage payload.
///
/// The usage sections are kept as raw value trees: their shape varies per
/// category and API version, so a malformed section degrades to "no data"
/// instead of failing the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageDocument {
    /// History entry id. Empty for current and forecast documents.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Stamped by the caller; the API does not return it.
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_id: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub last_update: Option<String>,
    /// Category name -> array of entries (or a `{notebook: [...]}` record for quantum).
    #[serde(default)]
    pub hourly_usage: Value,
    /// Category name -> array of entries. Currently only `savingsPlan`.
    #[serde(default)]
    pub monthly_usage: Value,
    /// Flat array of infrastructure entries tagged by `type`.
    #[serde(default)]
    pub resources_usage: Value,
    /// `{from, to}`
    #[serde(default)]
    pub period: Value,
    /// Contains at least `totalCredit`.
    #[serde(default)]
    pub usable_credits: Value,
}

impl UsageDocument {
    /// Decode a payload and stamp the project it was fetched for. An empty
    /// (`null`) payload is an empty document. Scalar members of the wrong
    /// type decode as text or as missing.
    pub fn from_value(value: Value, project_id: &str) -> serde_json::Result<Self> {
        let mut doc: UsageDocument = if value.is_null() {
            Self::default()
        } else {
            serde_json::from_value(value)?
        };
        doc.project_id = project_id.to_string();
        Ok(doc)
    }
}

/// Entry of the history listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryListItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
}

/// Which endpoint a usage document came from. Only affects column naming;
/// the projections are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    Current,
    Forecast,
    History,
}

impl UsageKind {
    /// Suffix of raw detail columns (`volumes_usage`, `volumes_forecast`).
    pub fn detail_suffix(self) -> &'static str {
        match self {
            UsageKind::Current | UsageKind::History => "usage",
            UsageKind::Forecast => "forecast",
        }
    }

    /// Infix of total columns (`grand_total_current_price`, ...).
    pub fn total_label(self) -> &'static str {
        match self {
            UsageKind::Current => "current",
            UsageKind::Forecast => "forecast",
            UsageKind::History => "historical",
        }
    }

    /// Prefix of period columns.
    pub fn period_prefix(self) -> &'static str {
        match self {
            UsageKind::Current | UsageKind::History => "usage_period",
            UsageKind::Forecast => "forecast_period",
        }
    }

    pub fn resources_column(self) -> &'static str {
        match self {
            UsageKind::Current | UsageKind::History => "resources_usage",
            UsageKind::Forecast => "resources_usage_forecast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_stamps_project() {
        let doc = UsageDocument::from_value(
            json!({
                "lastUpdate": "2025-11-04T10:00:00Z",
                "hourlyUsage": {"volume": []},
                "resourcesUsage": []
            }),
            "abc123",
        )
        .unwrap();

        assert_eq!(doc.project_id, "abc123");
        assert_eq!(doc.last_update.as_deref(), Some("2025-11-04T10:00:00Z"));
        assert!(doc.hourly_usage.is_object());
        assert!(doc.monthly_usage.is_null());
        assert!(doc.id.is_empty());
    }

    #[test]
    fn test_decode_tolerates_wrong_section_shapes() {
        let doc = UsageDocument::from_value(
            json!({"hourlyUsage": [1, 2], "monthlyUsage": "n/a", "resourcesUsage": {"x": 1}}),
            "p",
        )
        .unwrap();

        assert!(doc.hourly_usage.is_array());
        assert!(doc.monthly_usage.is_string());
    }

    #[test]
    fn test_project_id_overrides_payload() {
        let doc = UsageDocument::from_value(json!({"projectId": "other"}), "mine").unwrap();
        assert_eq!(doc.project_id, "mine");
    }

    #[test]
    fn test_null_payload_and_members() {
        let doc = UsageDocument::from_value(Value::Null, "p").unwrap();
        assert_eq!(doc.project_id, "p");
        assert!(doc.hourly_usage.is_null());

        let doc = UsageDocument::from_value(json!({"id": null, "lastUpdate": null}), "p").unwrap();
        assert!(doc.id.is_empty());
        assert!(doc.last_update.is_none());
    }

    #[test]
    fn test_decode_coerces_scalar_members() {
        let doc = UsageDocument::from_value(
            json!({
                "lastUpdate": 1730714400,
                "id": 7,
                "hourlyUsage": {"volume": [{"totalPrice": 1.0}]}
            }),
            "p",
        )
        .unwrap();

        assert_eq!(doc.last_update.as_deref(), Some("1730714400"));
        assert_eq!(doc.id, "7");
        assert_eq!(doc.hourly_usage["volume"][0]["totalPrice"], json!(1.0));

        let doc = UsageDocument::from_value(json!({"lastUpdate": {"at": "x"}}), "p").unwrap();
        assert!(doc.last_update.is_none());
    }

    #[test]
    fn test_listing_item_id_coerced() {
        let items: Vec<HistoryListItem> =
            serde_json::from_value(json!([{"id": 202511}, {"id": "RUN2_202512"}])).unwrap();
        assert_eq!(items[0].id, "202511");
        assert_eq!(items[1].id, "RUN2_202512");
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(UsageKind::Forecast.detail_suffix(), "forecast");
        assert_eq!(UsageKind::History.total_label(), "historical");
        assert_eq!(UsageKind::Current.period_prefix(), "usage_period");
    }
}
