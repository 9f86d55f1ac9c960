//! Session identifier generation.
//!
//! Identifiers are the only thing standing between a client and someone
//! else's session, so they come from a cryptographically secure random
//! source and never from the clock.

use rand::distr::{Alphanumeric, SampleString};

use crate::error::SessionResult;

/// Length of generated identifiers.
///
/// 32 alphanumeric characters carry roughly 190 bits of entropy
/// (log2(62^32)).
pub const SESSION_ID_LEN: usize = 32;

/// Source of new session identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produces a fresh identifier.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::IdGeneration` if no identifier can be produced.
    fn generate(&self) -> SessionResult<String>;
}

/// Generates identifiers from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdGenerator {
    len: usize,
}

impl RandomIdGenerator {
    /// Creates a generator producing identifiers of `len` characters.
    #[must_use]
    pub const fn with_len(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::with_len(SESSION_ID_LEN)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> SessionResult<String> {
        Ok(random_alphanumeric(self.len))
    }
}

/// Generates a random string of `len` characters from `a-z`, `A-Z`, `0-9`.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a session identifier of [`SESSION_ID_LEN`] characters.
#[must_use]
pub fn generate_session_id() -> String {
    random_alphanumeric(SESSION_ID_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_session_id_format() {
        let id = generate_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_are_unique() {
        let generator = RandomIdGenerator::default();
        let ids: HashSet<String> = (0..1000)
            .map(|_| generator.generate().unwrap())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn custom_length() {
        let id = RandomIdGenerator::with_len(48).generate().unwrap();
        assert_eq!(id.len(), 48);
    }

    #[test]
    fn ids_never_contain_separator() {
        let id = random_alphanumeric(1000);
        assert!(!id.contains(':'));
    }
}
