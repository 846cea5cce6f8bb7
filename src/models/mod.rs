//! Data models for the offline cache subsystem
//!
//! This module defines the DTOs used on the worker message channel and the
//! request/response types flowing through fetch interception.

pub mod fetch;
pub mod messages;
pub mod profile;

// Re-export commonly used types
pub use fetch::{FetchRequest, FetchResponse};
pub use messages::{Connectivity, WorkerMessage};
pub use profile::{AuthUser, ProfileSnapshot};
