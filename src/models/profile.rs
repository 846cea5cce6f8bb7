//! Profile and identity DTOs
//!
//! The profile snapshot is deliberately opaque: the worker transports and
//! stores it but never interprets its fields.

use serde::{Deserialize, Serialize};

// == Profile Snapshot ==
/// An opaque, structured profile value (identity fields plus arbitrary user
/// profile fields), transported by value in messages and in the profile-data
/// cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileSnapshot(serde_json::Value);

impl ProfileSnapshot {
    /// Wraps an arbitrary JSON value as a profile snapshot.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for ProfileSnapshot {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

// == Auth User ==
/// The identity provider's view of the currently signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user identifier, used to resolve the profile
    pub uid: String,
}

impl AuthUser {
    /// Creates a new AuthUser with the given uid.
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}
