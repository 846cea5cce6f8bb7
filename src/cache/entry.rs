//! Cache Entry Module
//!
//! Defines the structure for individual cache entries: a stored response
//! plus the time it was stored, used for age reporting when a cached
//! fallback is served.

use chrono::{DateTime, Utc};

use crate::models::FetchResponse;

// == Cache Entry ==
/// A single cached response with storage metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored response
    pub response: FetchResponse,
    /// When the response was stored
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(response: FetchResponse) -> Self {
        Self {
            response,
            stored_at: Utc::now(),
        }
    }

    // == Age ==
    /// Returns the entry age in whole minutes.
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.stored_at).num_minutes()
    }

    /// Returns a human-readable age, used when logging a cached fallback.
    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew (negative ages) as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}
