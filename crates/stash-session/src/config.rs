//! Session configuration.
//!
//! Two independent clocks govern a session:
//!
//! - the **timeout** is an inactivity window enforced by the manager, which
//!   compares now against the last-activity timestamp;
//! - the **expiration** is the absolute lifetime written with every store
//!   entry and with the client token, and slides forward on each write.
//!
//! A session can be store-valid yet timed out.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};
use crate::token::DEFAULT_TOKEN_NAME;

/// Environment variable overriding [`SessionConfig::timeout_secs`].
pub const ENV_TIMEOUT: &str = "STASH_SESSION_TIMEOUT";
/// Environment variable overriding [`SessionConfig::expiration_secs`].
pub const ENV_EXPIRATION: &str = "STASH_SESSION_EXPIRATION";
/// Environment variable overriding [`SessionConfig::token_name`].
pub const ENV_TOKEN_NAME: &str = "STASH_SESSION_TOKEN_NAME";

/// Session timing and token settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Inactivity window in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Lifetime of the client token and of every store entry, in seconds.
    #[serde(default = "default_expiration")]
    pub expiration_secs: u64,
    /// Name of the client token carrying the session identifier.
    #[serde(default = "default_token_name")]
    pub token_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            expiration_secs: default_expiration(),
            token_name: default_token_name(),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inactivity window.
    #[must_use]
    pub const fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Sets the token and store entry lifetime.
    #[must_use]
    pub const fn expiration_secs(mut self, seconds: u64) -> Self {
        self.expiration_secs = seconds;
        self
    }

    /// Sets the token name.
    #[must_use]
    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = name.into();
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::Config` if a variable is set but unparsable, or
    /// if the result fails [`SessionConfig::validate`].
    pub fn from_env() -> SessionResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            config.timeout_secs = parse_seconds(ENV_TIMEOUT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_EXPIRATION) {
            config.expiration_secs = parse_seconds(ENV_EXPIRATION, &raw)?;
        }
        if let Some(name) = lookup(ENV_TOKEN_NAME) {
            config.token_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that both windows are positive and the token has a name.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::Config` describing the first problem found.
    pub fn validate(&self) -> SessionResult<()> {
        if self.timeout_secs == 0 {
            return Err(SessionError::Config("timeout must be positive".into()));
        }
        if self.expiration_secs == 0 {
            return Err(SessionError::Config("expiration must be positive".into()));
        }
        if self.token_name.trim().is_empty() {
            return Err(SessionError::Config("token name must not be empty".into()));
        }
        Ok(())
    }

    /// Inactivity window, in seconds, as the signed type timestamps use.
    #[must_use]
    pub fn timeout_i64(&self) -> i64 {
        i64::try_from(self.timeout_secs).unwrap_or(i64::MAX)
    }

    /// Entry lifetime as a store TTL.
    #[must_use]
    pub const fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }

    /// Entry lifetime, in seconds, as the token carrier expects it.
    #[must_use]
    pub fn expiration_i64(&self) -> i64 {
        i64::try_from(self.expiration_secs).unwrap_or(i64::MAX)
    }
}

fn parse_seconds(name: &str, raw: &str) -> SessionResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| SessionError::Config(format!("{name} must be a whole number of seconds, got {raw:?}")))
}

const fn default_timeout() -> u64 {
    60 * 60
}

const fn default_expiration() -> u64 {
    60 * 60 * 24
}

fn default_token_name() -> String {
    DEFAULT_TOKEN_NAME.to_string()
}
