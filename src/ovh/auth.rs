//! OVH credentials and API endpoints
//!
//! Requests authenticate with an OAuth2 access token read from the
//! environment. Endpoints are either a known alias or an absolute URL.

use anyhow::{Context, Result};
use url::Url;

/// Environment variable holding the bearer access token.
pub const ACCESS_TOKEN_ENV: &str = "OVH_ACCESS_TOKEN";

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "ovh-eu";

/// Known endpoint aliases and their API roots.
const ENDPOINT_ALIASES: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
];

/// OVH API credentials
#[derive(Clone, Default)]
pub struct OvhCredentials {
    access_token: Option<String>,
}

impl std::fmt::Debug for OvhCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl OvhCredentials {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Read the access token from `OVH_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        let credentials = Self::new(std::env::var(ACCESS_TOKEN_ENV).ok());
        if credentials.access_token.is_none() {
            tracing::warn!("{} not set, sending unauthenticated requests", ACCESS_TOKEN_ENV);
        }
        credentials
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// Resolve an endpoint alias or URL to the API root, without trailing slash.
pub fn resolve_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();

    if let Some((_, root)) = ENDPOINT_ALIASES.iter().find(|(alias, _)| *alias == endpoint) {
        return Ok((*root).to_string());
    }

    let url = Url::parse(endpoint)
        .with_context(|| {
            format!(
                "Unknown OVH endpoint '{}' (expected a URL or one of: {})",
                endpoint,
                list_endpoints().join(", ")
            )
        })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!(
            "Unsupported scheme '{}' for OVH endpoint",
            url.scheme()
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// List the known endpoint aliases.
pub fn list_endpoints() -> Vec<&'static str> {
    ENDPOINT_ALIASES.iter().map(|(alias, _)| *alias).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(resolve_endpoint("ovh-eu").unwrap(), "https://eu.api.ovh.com/1.0");
        assert_eq!(resolve_endpoint(" ovh-ca ").unwrap(), "https://ca.api.ovh.com/1.0");
        assert_eq!(list_endpoints(), ["ovh-eu", "ovh-ca", "ovh-us"]);
    }

    #[test]
    fn test_resolve_url_passthrough() {
        assert_eq!(
            resolve_endpoint("http://127.0.0.1:8080/1.0/").unwrap(),
            "http://127.0.0.1:8080/1.0"
        );
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(resolve_endpoint("ovh-mars").is_err());
        assert!(resolve_endpoint("ftp://example.com").is_err());
    }

    #[test]
    fn test_blank_token_is_none() {
        assert!(OvhCredentials::new(Some("  ".into())).token().is_none());
        assert_eq!(OvhCredentials::new(Some("abc".into())).token(), Some("abc"));
    }

    #[test]
    fn test_debug_masks_token() {
        let creds = OvhCredentials::new(Some("secret-token".into()));
        assert!(!format!("{:?}", creds).contains("secret-token"));
    }
}
