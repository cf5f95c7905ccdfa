//! OVH API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Access token and endpoint resolution
//! - [`client`] - Main OVH client, implements [`crate::usage::Fetcher`]
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use ovhusage::ovh::auth::OvhCredentials;
//! use ovhusage::ovh::client::OvhClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = OvhClient::new("ovh-eu", OvhCredentials::from_env())?;
//!     let usage = client.get("/cloud/project/my-project/usage/current").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
