//! # stash-session
//!
//! Server-side session state for stateless request/response cycles.
//!
//! A client holds an opaque, signed session identifier; the server keeps a
//! bag of named string values for it in a shared [`KeyValueStore`]. Sessions
//! expire after a period of inactivity (the *timeout*), and every store entry
//! and client token carries its own absolute lifetime (the *expiration*).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stash_cache::MemoryStore;
//! use stash_session::{SessionFactory, TokenJar};
//!
//! let sessions = SessionFactory::new(Arc::new(MemoryStore::new()));
//!
//! // per request
//! let jar = TokenJar::new();
//! let session = sessions.session(&jar);
//! session.set("cart", "3 items").await?;
//! assert_eq!(session.get("cart").await?, "3 items");
//! ```
//!
//! [`KeyValueStore`]: stash_cache::KeyValueStore

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod id;
pub mod keys;
pub mod session;
pub mod token;
pub mod tracked;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use id::{IdGenerator, RandomIdGenerator};
pub use keys::SessionKeys;
pub use session::{Session, SessionFactory};
pub use token::{SignedToken, TokenCarrier, TokenJar, DEFAULT_TOKEN_NAME};
pub use tracked::TrackedKeys;
