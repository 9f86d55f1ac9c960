//! End-to-end session tests.
//!
//! The lifecycle tests run against the in-process store. The Redis tests
//! start an ephemeral Redis with testcontainers and are ignored by default;
//! run them with `cargo test -- --ignored` where a container runtime is
//! available.

mod common;
mod lifecycle;
mod redis_store;
