//! OYIEE Offline Cache - the profile PWA's offline caching subsystem
//!
//! A background worker cache controller that serves profile content while
//! offline, plus the main-context sync bridge that keeps the worker's
//! state consistent with live auth/profile state over a fire-and-forget
//! message channel.

pub mod bridge;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod net;
pub mod worker;

pub use bridge::{MemoryProfileStore, ProfileStore, SyncBridge};
pub use cache::CacheStorage;
pub use config::WorkerConfig;
pub use net::{HttpNetwork, MemoryNetwork, Network};
pub use worker::{CacheController, FetchDecision, WorkerHandle, WorkerRegistry};
