//! Message protocol DTOs
//!
//! Defines the JSON-shaped messages the page posts to the worker. The
//! protocol is fire-and-forget: there are no replies, and unrecognized
//! message kinds are ignored by the receiver.

use serde::{Deserialize, Serialize};

use crate::models::ProfileSnapshot;

// == Worker Message ==
/// A message posted from the page context to the worker.
///
/// Wire shape (JSON):
/// - `{"type": "SET_AUTH_STATUS", "isAuthenticated": bool, "profile": object|null}`
/// - `{"type": "UPDATE_PROFILE_CACHE", "profile": object}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// Replaces the worker's volatile auth state. Both fields truthy
    /// activates the worker and (re)populates the shell asset cache;
    /// anything else deactivates it and deletes both cache stores.
    #[serde(rename = "SET_AUTH_STATUS")]
    SetAuthStatus {
        #[serde(rename = "isAuthenticated")]
        is_authenticated: bool,
        #[serde(default)]
        profile: Option<ProfileSnapshot>,
    },

    /// Overwrites the single profile-data cache entry with the given
    /// snapshot. Never touches the asset cache.
    #[serde(rename = "UPDATE_PROFILE_CACHE")]
    UpdateProfileCache { profile: ProfileSnapshot },
}

// == Connectivity ==
/// Connectivity transition delivered to the worker by the hosting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}
