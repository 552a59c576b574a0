//! In-memory response cache.

use crate::core::ResponseCache;

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// A thread-safe, in-process [`ResponseCache`].
///
/// Entries have no TTL: the core treats freshness as unknown, and serving
/// arbitrarily stale data is preferable to serving nothing. Callers that
/// need expiry or eviction should supply their own cache implementation.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Value>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value);
    }
}
