//! ovhusage
//!
//! Exposes the OVH Public Cloud usage API (current usage, forecast, history
//! and savings plans) as flat, typed rows.
//!
//! - [`ovh`] - HTTP client for the OVH API
//! - [`usage`] - Normalization engine and table definitions
//! - [`config`] - Persistent user configuration

pub mod config;
pub mod ovh;
pub mod usage;
