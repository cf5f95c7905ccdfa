//! Configuration Management
//!
//! Handles persistent configuration storage for ovhusage.

use crate::ovh::auth::DEFAULT_ENDPOINT;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the OVH endpoint.
pub const ENDPOINT_ENV: &str = "OVH_ENDPOINT";
/// Environment variable naming the Public Cloud project.
pub const PROJECT_ENV: &str = "OVH_CLOUD_PROJECT_SERVICE";

const DEFAULT_HISTORY_CONCURRENCY: usize = 4;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Endpoint alias (`ovh-eu`) or API root URL
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Default Public Cloud project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Maximum concurrent history detail fetches
    #[serde(default)]
    pub history_concurrency: Option<usize>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ovhusage").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective project (CLI > config > environment)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(|| std::env::var(PROJECT_ENV).ok())
            .filter(|p| !p.trim().is_empty())
    }

    /// Get effective endpoint (CLI > config > environment > ovh-eu)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.endpoint.clone())
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Get effective history concurrency (CLI > config > 4), at least 1
    pub fn effective_concurrency(&self, cli: Option<usize>) -> usize {
        cli.or(self.history_concurrency)
            .unwrap_or(DEFAULT_HISTORY_CONCURRENCY)
            .max(1)
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}
