//! Error types for the offline cache subsystem
//!
//! Provides unified error handling using thiserror. Nothing here is ever
//! surfaced to a page: cache failures are logged and swallowed, network
//! failures trigger the per-policy fallback chain.

use thiserror::Error;

// == Cache Error Enum ==
/// Failures raised by the cache stores.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache key exceeds the maximum allowed length
    #[error("Key too long: {0} bytes")]
    KeyTooLong(usize),

    /// Response body exceeds the maximum allowed size
    #[error("Body too large: {0} bytes")]
    BodyTooLarge(usize),

    /// Store is at capacity and the key is not an overwrite
    #[error("Cache store full: {0}")]
    StoreFull(String),

    /// Profile snapshot could not be serialized for storage
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Network Error Enum ==
/// Transport-level fetch failures.
///
/// A non-2xx status is not an error at this layer; it is returned as a
/// regular response and interpreted by the caching policies.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// No network connectivity
    #[error("Network unreachable")]
    Offline,

    /// Request exceeded the transport timeout
    #[error("Request timed out")]
    Timeout,

    /// Any other transport failure
    #[error("Transport failure: {0}")]
    Transport(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache store operations.
pub type Result<T> = std::result::Result<T, CacheError>;
