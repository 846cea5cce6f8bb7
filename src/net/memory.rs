//! In-Memory Network Fake
//!
//! Programmable [`Network`] implementation for tests and offline embedding:
//! fixed routes by request path, an offline switch, and per-path fetch
//! counters for asserting that cache hits skip the network.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::models::{FetchRequest, FetchResponse};
use crate::net::Network;

// == Memory Network ==
/// Thread-safe programmable fake network.
#[derive(Debug, Clone, Default)]
pub struct MemoryNetwork {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Responses by request path
    routes: HashMap<String, FetchResponse>,
    /// When set, every fetch fails with a transport error
    offline: bool,
    /// Fetches attempted per path, including ones that failed offline
    fetch_counts: HashMap<String, usize>,
}

impl MemoryNetwork {
    /// Creates an online fake with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response served for the given request path.
    pub fn route(&self, path: &str, response: FetchResponse) {
        let mut inner = self.inner.write().expect("network lock poisoned");
        inner.routes.insert(path.to_string(), response);
    }

    /// Removes a routed path; subsequent fetches for it return 404.
    pub fn unroute(&self, path: &str) {
        let mut inner = self.inner.write().expect("network lock poisoned");
        inner.routes.remove(path);
    }

    /// Switches the fake between online and offline.
    pub fn set_offline(&self, offline: bool) {
        let mut inner = self.inner.write().expect("network lock poisoned");
        inner.offline = offline;
    }

    /// Returns how many fetches were attempted for the given path.
    pub fn fetch_count(&self, path: &str) -> usize {
        let inner = self.inner.read().expect("network lock poisoned");
        inner.fetch_counts.get(path).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Network for MemoryNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        let mut inner = self.inner.write().expect("network lock poisoned");
        *inner.fetch_counts.entry(request.path().to_string()).or_insert(0) += 1;

        if inner.offline {
            return Err(NetworkError::Offline);
        }

        Ok(inner
            .routes
            .get(request.path())
            .cloned()
            .unwrap_or_else(|| FetchResponse::text(404, "Not Found")))
    }
}
