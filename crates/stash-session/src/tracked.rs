//! Names of the values stored under a session.

use crate::keys::SEPARATOR;

/// Insertion-ordered set of value names.
///
/// Stored as one `:`-joined string. Parsing drops empty segments and
/// repeated names, so lists written by older writers that appended blindly
/// collapse to a set on the next write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedKeys {
    names: Vec<String>,
}

impl TrackedKeys {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Parses the stored form.
    #[must_use]
    pub fn parse(stored: &str) -> Self {
        let mut keys = Self::new();
        for name in stored.split(SEPARATOR) {
            keys.insert(name);
        }
        keys
    }

    /// Encodes to the stored form.
    #[must_use]
    pub fn encode(&self) -> String {
        self.names.join(":")
    }

    /// Adds `name` at the end. Returns `false` if it was already tracked.
    pub fn insert(&mut self, name: &str) -> bool {
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Removes `name`. Returns `false` if it was not tracked.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    /// Returns whether `name` is tracked.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of tracked names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Consumes the set, returning names in insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}
