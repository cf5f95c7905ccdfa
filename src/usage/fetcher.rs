//! Usage Fetcher
//!
//! Retrieves usage documents through a [`Fetcher`] and decodes them. History
//! is a two-phase fetch: the listing call enumerates period ids, then each id
//! is hydrated by its own detail call.

use super::document::{HistoryListItem, UsageDocument};
use super::plans::UsagePlanDocument;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::future::Future;

/// Source of decoded JSON documents, addressed by API path.
pub trait Fetcher: Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Usage endpoints of a Public Cloud project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageEndpoint {
    Current,
    Forecast,
    History,
    HistoryDetail(String),
    Plans,
}

impl UsageEndpoint {
    /// API path for `project_id`, with path segments percent-encoded.
    pub fn path(&self, project_id: &str) -> String {
        let base = format!("/cloud/project/{}/usage", urlencoding::encode(project_id));
        match self {
            UsageEndpoint::Current => format!("{}/current", base),
            UsageEndpoint::Forecast => format!("{}/forecast", base),
            UsageEndpoint::History => format!("{}/history", base),
            UsageEndpoint::HistoryDetail(id) => {
                format!("{}/history/{}", base, urlencoding::encode(id))
            }
            UsageEndpoint::Plans => format!("{}/plans", base),
        }
    }
}

/// Outcome of hydrating one history period. A failed detail fetch only
/// affects its own entry.
#[derive(Debug)]
pub struct HistoryEntry {
    pub usage_id: String,
    pub detail: Result<UsageDocument>,
}

async fn fetch_usage_document<F: Fetcher>(
    fetcher: &F,
    project_id: &str,
    endpoint: UsageEndpoint,
) -> Result<UsageDocument> {
    let path = endpoint.path(project_id);
    let value = fetcher.get(&path).await?;
    UsageDocument::from_value(value, project_id)
        .with_context(|| format!("Failed to decode usage document from {}", path))
}

/// Fetch the current usage of a project.
pub async fn fetch_current<F: Fetcher>(fetcher: &F, project_id: &str) -> Result<UsageDocument> {
    fetch_usage_document(fetcher, project_id, UsageEndpoint::Current).await
}

/// Fetch the end-of-period usage forecast of a project.
pub async fn fetch_forecast<F: Fetcher>(fetcher: &F, project_id: &str) -> Result<UsageDocument> {
    fetch_usage_document(fetcher, project_id, UsageEndpoint::Forecast).await
}

/// Fetch the savings plan usage of a project.
pub async fn fetch_plans<F: Fetcher>(fetcher: &F, project_id: &str) -> Result<UsagePlanDocument> {
    let path = UsageEndpoint::Plans.path(project_id);
    let value = fetcher.get(&path).await?;
    UsagePlanDocument::from_value(value, project_id)
        .with_context(|| format!("Failed to decode usage plans from {}", path))
}

/// List history period ids. An empty body lists nothing.
pub async fn list_history<F: Fetcher>(
    fetcher: &F,
    project_id: &str,
) -> Result<Vec<HistoryListItem>> {
    let path = UsageEndpoint::History.path(project_id);
    let value = fetcher.get(&path).await?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
        .with_context(|| format!("Failed to decode usage history listing from {}", path))
}

/// Fetch one history period. The detail payload may omit its own id; the
/// id used for the request is filled in then.
pub async fn fetch_history_detail<F: Fetcher>(
    fetcher: &F,
    project_id: &str,
    usage_id: &str,
) -> Result<UsageDocument> {
    let endpoint = UsageEndpoint::HistoryDetail(usage_id.to_string());
    let mut doc = fetch_usage_document(fetcher, project_id, endpoint).await?;
    if doc.id.is_empty() {
        doc.id = usage_id.to_string();
    }
    Ok(doc)
}

/// List history periods, then hydrate each one with at most `concurrency`
/// detail fetches in flight. Results keep the listing order.
///
/// A listing failure is returned as an error; detail failures are reported
/// per entry.
pub async fn fetch_history<F: Fetcher>(
    fetcher: &F,
    project_id: &str,
    concurrency: usize,
) -> Result<Vec<HistoryEntry>> {
    let items = list_history(fetcher, project_id).await?;
    tracing::info!("Listed {} usage history periods for {}", items.len(), project_id);

    let entries: Vec<HistoryEntry> = stream::iter(items)
        .map(|item| async move {
            let detail = fetch_history_detail(fetcher, project_id, &item.id).await;
            if let Err(e) = &detail {
                tracing::warn!("Failed to fetch usage history {}: {:#}", item.id, e);
            }
            HistoryEntry {
                usage_id: item.id,
                detail,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory fetcher keyed by path. Missing paths fail like a 404.
    #[derive(Default)]
    struct MapFetcher {
        responses: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn with(mut self, path: &str, value: Value) -> Self {
            self.responses.insert(path.to_string(), value);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Fetcher for MapFetcher {
        async fn get(&self, path: &str) -> Result<Value> {
            self.calls.lock().unwrap().push(path.to_string());
            self.responses
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("API request failed: 404 Not Found"))
        }
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            UsageEndpoint::Current.path("abc"),
            "/cloud/project/abc/usage/current"
        );
        assert_eq!(
            UsageEndpoint::Forecast.path("abc"),
            "/cloud/project/abc/usage/forecast"
        );
        assert_eq!(
            UsageEndpoint::History.path("abc"),
            "/cloud/project/abc/usage/history"
        );
        assert_eq!(
            UsageEndpoint::HistoryDetail("RUN2_202511".into()).path("abc"),
            "/cloud/project/abc/usage/history/RUN2_202511"
        );
        assert_eq!(UsageEndpoint::Plans.path("abc"), "/cloud/project/abc/usage/plans");
    }

    #[test]
    fn test_endpoint_path_encodes_segments() {
        assert_eq!(
            UsageEndpoint::HistoryDetail("a/b c".into()).path("p 1"),
            "/cloud/project/p%201/usage/history/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_fetch_current_stamps_project() {
        let fetcher = MapFetcher::default().with(
            "/cloud/project/p1/usage/current",
            json!({"hourlyUsage": {"volume": [{"totalPrice": 1.0}]}}),
        );

        let doc = fetch_current(&fetcher, "p1").await.unwrap();
        assert_eq!(doc.project_id, "p1");
        assert!(doc.hourly_usage.is_object());
    }

    #[tokio::test]
    async fn test_fetch_error_passes_through() {
        let fetcher = MapFetcher::default();
        let err = fetch_forecast(&fetcher, "p1").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_history_backfills_id() {
        let fetcher = MapFetcher::default()
            .with("/cloud/project/p1/usage/history", json!([{"id": "RUN2_202511"}]))
            .with(
                "/cloud/project/p1/usage/history/RUN2_202511",
                json!({"id": "", "hourlyUsage": {}}),
            );

        let entries = fetch_history(&fetcher, "p1", 4).await.unwrap();
        assert_eq!(entries.len(), 1);
        let doc = entries[0].detail.as_ref().unwrap();
        assert_eq!(doc.id, "RUN2_202511");
        assert_eq!(doc.project_id, "p1");
    }

    #[tokio::test]
    async fn test_history_keeps_payload_id() {
        let fetcher = MapFetcher::default().with(
            "/cloud/project/p1/usage/history/h1",
            json!({"id": "server-side-id"}),
        );

        let doc = fetch_history_detail(&fetcher, "p1", "h1").await.unwrap();
        assert_eq!(doc.id, "server-side-id");
    }

    #[tokio::test]
    async fn test_history_detail_failure_is_isolated() {
        let fetcher = MapFetcher::default()
            .with(
                "/cloud/project/p1/usage/history",
                json!([{"id": "h1"}, {"id": "missing"}, {"id": "h3"}]),
            )
            .with("/cloud/project/p1/usage/history/h1", json!({}))
            .with("/cloud/project/p1/usage/history/h3", json!({}));

        let entries = fetch_history(&fetcher, "p1", 2).await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.usage_id.as_str()).collect();
        assert_eq!(ids, ["h1", "missing", "h3"]);
        assert!(entries[0].detail.is_ok());
        assert!(entries[1].detail.is_err());
        assert!(entries[2].detail.is_ok());
    }

    #[tokio::test]
    async fn test_history_listing_failure_is_hard_error() {
        let fetcher = MapFetcher::default();
        assert!(fetch_history(&fetcher, "p1", 4).await.is_err());
        assert_eq!(fetcher.calls(), ["/cloud/project/p1/usage/history"]);
    }

    #[tokio::test]
    async fn test_history_lists_before_details() {
        let fetcher = MapFetcher::default()
            .with("/cloud/project/p1/usage/history", json!([{"id": "a"}, {"id": "b"}]))
            .with("/cloud/project/p1/usage/history/a", json!({}))
            .with("/cloud/project/p1/usage/history/b", json!({}));

        fetch_history(&fetcher, "p1", 1).await.unwrap();
        assert_eq!(
            fetcher.calls(),
            [
                "/cloud/project/p1/usage/history",
                "/cloud/project/p1/usage/history/a",
                "/cloud/project/p1/usage/history/b",
            ]
        );
    }

    #[test]
    fn test_fetch_plans_blocking() {
        let fetcher = MapFetcher::default().with(
            "/cloud/project/p1/usage/plans",
            json!({"flavors": [{"flavor": "b3-8"}]}),
        );

        let doc = tokio_test::block_on(fetch_plans(&fetcher, "p1")).unwrap();
        assert_eq!(doc.project_id, "p1");
        assert_eq!(doc.flavor_name(), Some("b3-8"));
    }

    #[tokio::test]
    async fn test_empty_listing_body_has_no_entries() {
        let fetcher =
            MapFetcher::default().with("/cloud/project/p1/usage/history", Value::Null);

        let entries = fetch_history(&fetcher, "p1", 4).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(fetcher.calls(), ["/cloud/project/p1/usage/history"]);
    }

    #[tokio::test]
    async fn test_malformed_listing_is_error() {
        let fetcher = MapFetcher::default()
            .with("/cloud/project/p1/usage/history", json!({"not": "a list"}));
        let err = list_history(&fetcher, "p1").await.unwrap_err();
        assert!(err.to_string().contains("Failed to decode usage history listing"));
    }
}
