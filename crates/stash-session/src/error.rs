//! Session error types.

use stash_cache::CacheError;
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The request carries no session token.
    #[error("no session for this request")]
    NoSession,

    /// The session token is present but the inactivity window has passed.
    #[error("session has timed out")]
    TimedOut,

    /// The named value was never set, or has expired in the store.
    #[error("session value not found: {0}")]
    NotFound(String),

    /// The value name cannot be stored under the session.
    #[error("invalid session key name: {0:?}")]
    InvalidKey(String),

    /// A session identifier could not be generated.
    #[error("failed to generate session identifier: {0}")]
    IdGeneration(String),

    /// The backing store failed.
    #[error("session store error: {0}")]
    Store(#[from] CacheError),

    /// Invalid session configuration.
    #[error("session configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Checks if the error only means "no value available".
    ///
    /// Callers that do not care why a value is missing can treat all of
    /// these the same way.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::NoSession | Self::TimedOut | Self::NotFound(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
