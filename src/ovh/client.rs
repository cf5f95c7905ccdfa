//! OVH Client
//!
//! Main client for the OVH API, combining credentials, endpoint and HTTP
//! transport. It is the production [`Fetcher`].

use super::auth::{resolve_endpoint, OvhCredentials};
use super::http::OvhHttpClient;
use crate::usage::Fetcher;
use anyhow::Result;
use serde_json::Value;

/// Main OVH client
#[derive(Clone, Debug)]
pub struct OvhClient {
    pub credentials: OvhCredentials,
    pub http: OvhHttpClient,
    /// API root, e.g. `https://eu.api.ovh.com/1.0`
    pub base_url: String,
}

impl OvhClient {
    /// Create a client for an endpoint alias or URL.
    pub fn new(endpoint: &str, credentials: OvhCredentials) -> Result<Self> {
        let base_url = resolve_endpoint(endpoint)?;
        let http = OvhHttpClient::new()?;

        tracing::info!("Using OVH API at {}", base_url);

        Ok(Self {
            credentials,
            http,
            base_url,
        })
    }

    /// Build the absolute URL for an API path (`/cloud/project/...`).
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        self.http.get(&url, self.credentials.token()).await
    }
}

impl Fetcher for OvhClient {
    async fn get(&self, path: &str) -> Result<Value> {
        OvhClient::get(self, path).await
    }
}
