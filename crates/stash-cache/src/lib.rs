//! # stash-cache
//!
//! Key-value store abstraction for stash sessions.
//!
//! The session manager never talks to a backend directly. It needs three
//! capabilities from a store, captured by [`KeyValueStore`]:
//!
//! - write a string value with an expiry
//! - read a string value back
//! - remove a batch of keys, best effort
//!
//! The Redis implementation lives in `stash-cache-redis`. This crate also
//! ships [`MemoryStore`], an in-process implementation used by tests and
//! single-node deployments, and the [`Clock`] abstraction both the store and
//! the session manager read time from.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use stash_cache::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("greeting", "hello", Duration::from_secs(60)).await?;
//! assert_eq!(store.get("greeting").await?, "hello");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod error;
pub mod memory;
pub mod provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryStore;
pub use provider::KeyValueStore;
