//! Store error types.
//!
//! Session code reads [`CacheError::NotFound`] as "entry absent", which for
//! the last-activity entry means the session has lapsed. Every other variant
//! is a backend failure and is passed on to the caller.

use std::fmt;

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Connection to the store backend failed.
    Connection(String),
    /// A stored value could not be encoded or decoded.
    Serialization(String),
    /// Key not found, or its TTL has elapsed. Not a failure of the backend.
    NotFound,
    /// The backend did not answer within the command timeout.
    Timeout,
    /// Invalid store configuration.
    Configuration(String),
    /// Internal store error.
    Internal(String),
}

impl CacheError {
    /// Checks if this is a missing-key error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "store connection error: {msg}"),
            Self::Serialization(msg) => write!(f, "store serialization error: {msg}"),
            Self::NotFound => write!(f, "key not found in store"),
            Self::Timeout => write!(f, "store operation timed out"),
            Self::Configuration(msg) => write!(f, "store configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "internal store error: {msg}"),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for store operations.
pub type CacheResult<T> = Result<T, CacheError>;
