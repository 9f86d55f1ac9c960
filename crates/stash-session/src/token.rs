//! Client-held session token.
//!
//! The session identifier travels between client and server as a signed,
//! expiring token (a cookie, for HTTP). Signing and transport belong to the
//! web layer; the session manager only reads and writes through
//! [`TokenCarrier`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Default token name.
pub const DEFAULT_TOKEN_NAME: &str = "GOSESSIONID";

/// Read/write access to the signed tokens of the current request.
pub trait TokenCarrier: Send + Sync {
    /// Returns the verified value of token `name`, if the request carries one.
    fn read_signed(&self, name: &str) -> Option<String>;

    /// Sets token `name` to `value`, expiring `ttl_secs` from now.
    ///
    /// A TTL of zero or less deletes the token immediately.
    fn write_signed(&self, name: &str, value: &str, ttl_secs: i64);
}

impl<T: TokenCarrier + ?Sized> TokenCarrier for &T {
    fn read_signed(&self, name: &str) -> Option<String> {
        (**self).read_signed(name)
    }

    fn write_signed(&self, name: &str, value: &str, ttl_secs: i64) {
        (**self).write_signed(name, value, ttl_secs);
    }
}

impl<T: TokenCarrier + ?Sized> TokenCarrier for Arc<T> {
    fn read_signed(&self, name: &str) -> Option<String> {
        (**self).read_signed(name)
    }

    fn write_signed(&self, name: &str, value: &str, ttl_secs: i64) {
        (**self).write_signed(name, value, ttl_secs);
    }
}

/// A token written during the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// Token value.
    pub value: String,
    /// Lifetime requested by the writer, in seconds. Zero or less means the
    /// client should drop the token.
    pub ttl_secs: i64,
}

impl SignedToken {
    /// Checks if the token should be kept by the client.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.ttl_secs > 0
    }
}

/// In-memory token carrier.
///
/// Stands in for a cookie jar: seed it with the tokens an incoming request
/// presented, hand it to the session, then copy [`TokenJar::written`] onto
/// the response. Presented tokens are never echoed back, so a request that
/// only reads its session has nothing to write.
#[derive(Debug, Default)]
pub struct TokenJar {
    presented: HashMap<String, String>,
    written: RwLock<HashMap<String, SignedToken>>,
}

impl TokenJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token presented by the client.
    #[must_use]
    pub fn with_token(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.presented.insert(name.into(), value.into());
        self
    }

    /// Returns token `name` if this request set it to a live value.
    #[must_use]
    pub fn token(&self, name: &str) -> Option<SignedToken> {
        self.written
            .read()
            .get(name)
            .filter(|t| t.is_live())
            .cloned()
    }

    /// Returns every token written during the request, deletions included.
    #[must_use]
    pub fn written(&self) -> HashMap<String, SignedToken> {
        self.written.read().clone()
    }
}

impl TokenCarrier for TokenJar {
    fn read_signed(&self, name: &str) -> Option<String> {
        if let Some(token) = self.written.read().get(name) {
            return token.is_live().then(|| token.value.clone());
        }
        self.presented.get(name).cloned()
    }

    fn write_signed(&self, name: &str, value: &str, ttl_secs: i64) {
        self.written.write().insert(
            name.to_string(),
            SignedToken {
                value: value.to_string(),
                ttl_secs,
            },
        );
    }
}
