//! Network Module
//!
//! The outbound fetch seam. The worker talks to the network through the
//! [`Network`] trait so the policies can be driven by a real HTTP client
//! or by the in-memory fake.

use std::fmt;

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::models::{FetchRequest, FetchResponse};

mod http;
mod memory;

pub use http::HttpNetwork;
pub use memory::MemoryNetwork;

// == Network Trait ==
/// An outbound fetch transport.
///
/// Errors are transport-level only (offline, timeout); a non-2xx status is
/// a successful fetch and is interpreted by the caching policies, never
/// here.
#[async_trait]
pub trait Network: Send + Sync + fmt::Debug {
    /// Performs the request and returns the whole response.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError>;
}
