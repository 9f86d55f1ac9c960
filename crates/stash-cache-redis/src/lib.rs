//! # stash-cache-redis
//!
//! Redis store adapter for stash sessions.
//!
//! This crate implements the `KeyValueStore` contract from `stash-cache`
//! using the `fred` client. Each contract call is a single Redis command:
//!
//! - `set` is `SET key value EX ttl`
//! - `get` is `GET key`
//! - `delete_many` is `DEL key [key ...]`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stash_cache_redis::{RedisConfig, RedisStore};
//!
//! let config = RedisConfig::default().host("localhost").port(6379);
//! let store = Arc::new(RedisStore::new(config).await?);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod provider;

pub use config::RedisConfig;
pub use provider::RedisStore;
