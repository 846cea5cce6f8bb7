//! Cache Store Module
//!
//! A single named cache store: a key→response mapping with quota limits.
//! Keys are request URLs (scheme + host + path + query); values are whole
//! responses with storage metadata.

use std::collections::HashMap;

use crate::cache::{CacheEntry, MAX_KEY_LENGTH};
use crate::error::{CacheError, Result};
use crate::models::FetchResponse;

// == Cache Store ==
/// Key→response storage for one named cache.
///
/// Overwrites are always allowed; new keys are rejected once the store is
/// at capacity. There is no eviction: the platform analogue fails the put
/// when quota is exhausted, and callers log and swallow that failure.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum response body size in bytes
    max_body_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given quota limits.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the store can hold
    /// * `max_body_bytes` - Maximum accepted response body size in bytes
    pub fn new(max_entries: usize, max_body_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
            max_body_bytes,
        }
    }

    // == Put ==
    /// Stores a response under the given key.
    ///
    /// If the key already exists, the entry is overwritten wholesale and its
    /// storage timestamp reset. Never merges.
    ///
    /// # Arguments
    /// * `key` - The cache key (request URL without fragment)
    /// * `response` - The whole response to store
    pub fn put(&mut self, key: String, response: FetchResponse) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong(key.len()));
        }

        if response.body.len() > self.max_body_bytes {
            return Err(CacheError::BodyTooLarge(response.body.len()));
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            return Err(CacheError::StoreFull(key));
        }

        self.entries.insert(key, CacheEntry::new(response));
        Ok(())
    }

    // == Lookup ==
    /// Returns the entry stored under the given key, if any.
    ///
    /// Matching is exact: the key must equal the stored request URL.
    pub fn lookup(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Returns true if the store holds an entry for the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the stored keys, for diagnostics.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
