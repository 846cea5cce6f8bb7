//! HTTP Network Adapter
//!
//! Real outbound fetch backed by reqwest. Used when the worker is embedded
//! in a host with actual network access; tests use the in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::NetworkError;
use crate::models::{FetchRequest, FetchResponse};
use crate::net::Network;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// == HTTP Network ==
/// reqwest-backed [`Network`] implementation.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    /// Creates an adapter with the default transport timeout.
    pub fn new() -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|error| NetworkError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
        debug!("fetching {}", request.url);

        let response = self
            .client
            .get(request.url.clone())
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    NetworkError::Timeout
                } else if error.is_connect() {
                    NetworkError::Offline
                } else {
                    NetworkError::Transport(error.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let mut fetched = FetchResponse::new(status, Vec::new());
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                fetched = fetched.with_header(name.as_str(), value);
            }
        }
        fetched.body = response
            .bytes()
            .await
            .map_err(|error| NetworkError::Transport(error.to_string()))?
            .to_vec();

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_network_builds() {
        assert!(HttpNetwork::new().is_ok());
    }
}
