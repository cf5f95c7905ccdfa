//! HTTP utilities for OVH REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip non-printable characters before logging.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Non-success HTTP status returned by the OVH API.
///
/// Kept as a typed error so callers can recover the status through any
/// number of `context` layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode) -> Self {
        Self { status }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API request failed: {}", self.status)
    }
}

impl std::error::Error for ApiError {}

/// Find the API status anywhere in an error chain.
pub fn api_status(error: &anyhow::Error) -> Option<StatusCode> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .map(|api| api.status)
}

/// HTTP client wrapper for OVH API calls
#[derive(Clone, Debug)]
pub struct OvhHttpClient {
    client: Client,
}

impl OvhHttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ovhusage/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body. `token` is sent as a bearer
    /// token when present.
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::new(status).into());
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format an OVH API error for display.
/// Raw API messages are never shown; known statuses map to short hints.
pub fn format_ovh_error(error: &anyhow::Error) -> String {
    if let Some(status) = api_status(error) {
        return match status.as_u16() {
            403 => "Permission denied. Check the rights granted to your OVH token.".to_string(),
            401 => "Authentication failed. Set a valid OVH_ACCESS_TOKEN.".to_string(),
            404 => "Resource not found. Check the project ID.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            500 | 503 => "OVH API temporarily unavailable. Please try again.".to_string(),
            409 => "Conflict reported by the OVH API.".to_string(),
            _ => "Request failed. Check your network connection and try again.".to_string(),
        };
    }

    let is_transport = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<reqwest::Error>())
        .any(|e| e.is_connect() || e.is_timeout() || e.is_request());
    if is_transport {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
