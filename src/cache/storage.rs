//! Cache Storage Module
//!
//! The named-store registry shared by the worker and its spawned cache
//! population tasks. Models the platform cache storage surface: open a
//! store by name, match a key in one store or across all stores, put,
//! and delete a whole store. The handle is cheaply cloneable and outlives
//! individual controller instances, which is what makes cached content
//! survive a worker restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStore};
use crate::error::Result;
use crate::models::FetchResponse;

// == Cache Storage ==
/// Registry of named cache stores behind a shared async lock.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    stores: Arc<RwLock<HashMap<String, CacheStore>>>,
    max_entries: usize,
    max_body_bytes: usize,
}

impl CacheStorage {
    // == Constructor ==
    /// Creates an empty storage whose stores use the given quota limits.
    pub fn new(max_entries: usize, max_body_bytes: usize) -> Self {
        Self {
            stores: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
            max_body_bytes,
        }
    }

    // == Open ==
    /// Opens a named store, creating it empty if absent.
    pub async fn open(&self, name: &str) {
        let mut stores = self.stores.write().await;
        stores
            .entry(name.to_string())
            .or_insert_with(|| CacheStore::new(self.max_entries, self.max_body_bytes));
    }

    // == Put ==
    /// Stores a response under `key` in the named store, opening the store
    /// if it does not exist yet. Overwrites any prior entry for the key.
    pub async fn put(&self, name: &str, key: String, response: FetchResponse) -> Result<()> {
        let mut stores = self.stores.write().await;
        stores
            .entry(name.to_string())
            .or_insert_with(|| CacheStore::new(self.max_entries, self.max_body_bytes))
            .put(key, response)
    }

    // == Match ==
    /// Looks up `key` in the named store only.
    pub async fn match_in(&self, name: &str, key: &str) -> Option<CacheEntry> {
        let stores = self.stores.read().await;
        stores.get(name).and_then(|store| store.lookup(key)).cloned()
    }

    /// Looks up `key` across all stores, returning the first match.
    pub async fn match_any(&self, key: &str) -> Option<CacheEntry> {
        let stores = self.stores.read().await;
        stores.values().find_map(|store| store.lookup(key)).cloned()
    }

    // == Delete ==
    /// Deletes a whole named store. Returns whether it existed; deleting an
    /// absent store is not an error.
    pub async fn delete(&self, name: &str) -> bool {
        let mut stores = self.stores.write().await;
        stores.remove(name).is_some()
    }

    // == Introspection ==
    /// Returns true if a store with the given name exists.
    pub async fn has_store(&self, name: &str) -> bool {
        let stores = self.stores.read().await;
        stores.contains_key(name)
    }

    /// Returns the entry count of the named store, if it exists.
    pub async fn store_len(&self, name: &str) -> Option<usize> {
        let stores = self.stores.read().await;
        stores.get(name).map(CacheStore::len)
    }
}
