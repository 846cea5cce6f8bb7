//! Configuration Module
//!
//! Handles loading and managing worker configuration from environment variables.

use std::env;

use url::Url;

/// Worker configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Origin the worker controls; requests to other origins are never intercepted
    pub origin: Url,
    /// Maximum number of entries a single cache store can hold
    pub max_entries: usize,
    /// Maximum response body size in bytes accepted into a cache store
    pub max_body_bytes: usize,
}

impl WorkerConfig {
    /// Creates a new WorkerConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `WORKER_ORIGIN` - Origin the worker controls (default: https://oyiee.app)
    /// - `CACHE_MAX_ENTRIES` - Maximum entries per cache store (default: 512)
    /// - `CACHE_MAX_BODY_BYTES` - Maximum cached body size in bytes (default: 4 MB)
    pub fn from_env() -> Self {
        Self {
            origin: env::var("WORKER_ORIGIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_origin),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(512),
            max_body_bytes: env::var("CACHE_MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4 * 1024 * 1024),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            max_entries: 512,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

fn default_origin() -> Url {
    Url::parse("https://oyiee.app").expect("default origin is a valid URL")
}
