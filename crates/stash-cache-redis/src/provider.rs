//! Redis store implementation.

use std::time::Duration;

use async_trait::async_trait;
use fred::prelude::*;
use stash_cache::{CacheError, CacheResult, KeyValueStore};

use crate::config::RedisConfig;
use crate::error::from_redis_error;

/// Redis-backed [`KeyValueStore`].
///
/// The `fred` client multiplexes commands over its connection and reconnects
/// with exponential backoff, so one instance can be shared (behind an `Arc`)
/// by every request in the process.
pub struct RedisStore {
    client: Client,
    config: RedisConfig,
}

impl RedisStore {
    /// Connects to Redis and returns a ready store.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid or the connection
    /// cannot be established.
    pub async fn new(config: RedisConfig) -> CacheResult<Self> {
        let redis_config = Config::from_url(&config.connection_url())
            .map_err(|e| CacheError::Configuration(e.to_string()))?;

        let connect_timeout = config.connect_timeout();
        let command_timeout = config.command_timeout_duration();

        let client = Builder::from_config(redis_config)
            .with_connection_config(|conn| {
                conn.connection_timeout = connect_timeout;
            })
            .with_performance_config(|perf| {
                perf.default_command_timeout = command_timeout;
            })
            .set_policy(ReconnectPolicy::new_exponential(
                0,
                100,
                config.max_reconnect_delay_ms,
                2,
            ))
            .build()
            .map_err(from_redis_error)?;

        client.init().await.map_err(from_redis_error)?;
        tracing::info!(host = %config.host, port = config.port, "connected to redis");

        Ok(Self { client, config })
    }

    /// Wraps an already initialized client.
    #[must_use]
    pub const fn from_client(client: Client, config: RedisConfig) -> Self {
        Self { client, config }
    }

    /// Returns the underlying Redis client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the configuration this store was built from.
    #[must_use]
    pub const fn config(&self) -> &RedisConfig {
        &self.config
    }

    fn key(&self, key: &str) -> String {
        self.config.prefixed_key(key)
    }
}

/// Converts a TTL to the whole seconds Redis `EX` expects, never less than one.
#[allow(clippy::cast_possible_wrap)]
const fn expire_seconds(ttl: Duration) -> i64 {
    let seconds = ttl.as_secs();
    if seconds == 0 {
        1
    } else if seconds > i64::MAX as u64 {
        i64::MAX
    } else {
        seconds as i64
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let key = self.key(key);
        self.client
            .set::<(), _, _>(
                &key,
                value,
                Some(Expiration::EX(expire_seconds(ttl))),
                None,
                false,
            )
            .await
            .map_err(from_redis_error)
    }

    async fn get(&self, key: &str) -> CacheResult<String> {
        let key = self.key(key);
        let value: Option<String> = self.client.get(&key).await.map_err(from_redis_error)?;
        value.ok_or(CacheError::NotFound)
    }

    async fn delete_many(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        self.client
            .del::<(), _>(keys)
            .await
            .map_err(from_redis_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_seconds_has_one_second_floor() {
        assert_eq!(expire_seconds(Duration::ZERO), 1);
        assert_eq!(expire_seconds(Duration::from_millis(900)), 1);
        assert_eq!(expire_seconds(Duration::from_secs(86_400)), 86_400);
    }

    #[test]
    fn expire_seconds_saturates() {
        assert_eq!(expire_seconds(Duration::from_secs(u64::MAX)), i64::MAX);
    }
}
