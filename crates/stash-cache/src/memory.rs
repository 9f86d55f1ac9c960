//! In-process store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, CacheResult};
use crate::provider::KeyValueStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    /// Epoch second at which the entry stops being readable.
    expires_at: i64,
}

/// A [`KeyValueStore`] held in process memory.
///
/// Entries expire lazily: an expired entry is dropped the next time it is
/// read, or in bulk by [`MemoryStore::purge_expired`].
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store reading the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Returns the number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the store holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether `key` holds an unexpired value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > now)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "purged expired entries");
        }
        removed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Converts a TTL to whole seconds, never less than one.
#[allow(clippy::cast_possible_wrap)]
fn ttl_seconds(ttl: Duration) -> i64 {
    ttl.as_secs().clamp(1, i64::MAX as u64) as i64
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let expires_at = self.clock.now().saturating_add(ttl_seconds(ttl));
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<String> {
        let now = self.clock.now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => None,
            None => return Err(CacheError::NotFound),
        };

        match value {
            Some(v) => Ok(v),
            None => {
                self.entries
                    .remove_if(key, |_, entry| entry.expires_at <= now);
                Err(CacheError::NotFound)
            }
        }
    }

    async fn delete_many(&self, keys: &[String]) -> CacheResult<()> {
        for key in keys {
            self.entries.remove(key);
        }
        Ok(())
    }
}
