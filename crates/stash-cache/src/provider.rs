//! Store provider trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

/// String key-value store with per-key expiry.
///
/// Implementations must be thread-safe: one store instance is shared by every
/// request handled by the process, and it is the only serialization point
/// between them. Timeouts and retries for backend calls belong to the
/// implementation.
///
/// No ordering or atomicity is promised across keys. Callers that write
/// several related keys must tolerate observing only some of them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Writes `value` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any previous value and resets its expiry. A TTL shorter
    /// than one second is treated as one second.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Reads the current value of `key`.
    ///
    /// Returns `CacheError::NotFound` if the key is absent or expired.
    async fn get(&self, key: &str) -> CacheResult<String>;

    /// Removes every key in `keys`.
    ///
    /// Absent keys are not an error, and an empty slice is a no-op.
    async fn delete_many(&self, keys: &[String]) -> CacheResult<()>;
}
