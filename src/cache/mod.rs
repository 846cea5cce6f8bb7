//! Cache Module
//!
//! Named cache stores holding whole HTTP responses keyed by request URL,
//! plus the store names and fixed asset paths the worker policies use.

mod entry;
mod storage;
mod store;

// Re-export public types
pub use entry::CacheEntry;
pub use storage::CacheStorage;
pub use store::CacheStore;

// == Public Constants ==
/// Store holding shell assets and profile-page responses.
///
/// Names carry a literal version suffix; bumping the version orphans the
/// old store, which a newer worker never reads.
pub const ASSET_CACHE_NAME: &str = "oyiee-profile-cache-v1";

/// Store holding the single serialized profile snapshot.
pub const PROFILE_DATA_CACHE_NAME: &str = "oyiee-profile-data-v1";

/// Fixed logical key of the profile-data entry.
pub const PROFILE_DATA_KEY: &str = "/api/profile-data";

/// App-shell assets cached on activation, checked by substring containment
/// against intercepted request paths.
pub const PROFILE_ASSETS: [&str; 4] = [
    "/",
    "/static/js/bundle.js",
    "/static/css/main.css",
    "/manifest.json",
];

/// Paths under this prefix are profile content and get network-first
/// treatment.
pub const PROFILE_ROUTE_PREFIX: &str = "/profile/";

/// Maximum allowed cache key length in bytes
pub const MAX_KEY_LENGTH: usize = 2048;
