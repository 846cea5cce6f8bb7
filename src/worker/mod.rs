//! Worker Module
//!
//! The background cache worker: the policy-holding controller and the
//! registry that hosts worker instances and dispatches page events to them.

pub mod controller;
pub mod registry;


// Re-export public types
pub use controller::{AuthState, CacheController, FetchDecision};
pub use registry::{WorkerEvent, WorkerHandle, WorkerRegistry};
