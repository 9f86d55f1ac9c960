//! Store key layout for a session.
//!
//! Every entry of a session lives under `session:<id>`:
//!
//! | Key | Holds |
//! |---|---|
//! | `session:<id>` | creation time, epoch seconds |
//! | `session:<id>:last` | last activity time, epoch seconds |
//! | `session:<id>:keys` | tracked value names, `:`-joined |
//! | `session:<id>:key:<name>` | the value stored under `name` |
//!
//! The layout is shared with existing deployments and must not change.

/// Separator between key segments.
pub const SEPARATOR: char = ':';

const ROOT: &str = "session";

fn join(parts: &[&str]) -> String {
    parts.join(":")
}

/// Key builder for one session identifier.
#[derive(Debug, Clone, Copy)]
pub struct SessionKeys<'a> {
    id: &'a str,
}

impl<'a> SessionKeys<'a> {
    /// Creates the key builder for `id`.
    #[must_use]
    pub const fn new(id: &'a str) -> Self {
        Self { id }
    }

    /// Key holding the creation timestamp.
    #[must_use]
    pub fn created(&self) -> String {
        join(&[ROOT, self.id])
    }

    /// Key holding the last-activity timestamp.
    #[must_use]
    pub fn last_activity(&self) -> String {
        join(&[ROOT, self.id, "last"])
    }

    /// Key holding the tracked value names.
    #[must_use]
    pub fn tracked(&self) -> String {
        join(&[ROOT, self.id, "keys"])
    }

    /// Key holding the value stored under `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> String {
        join(&[ROOT, self.id, "key", name])
    }

    /// The bookkeeping keys: creation, last activity and tracked names.
    #[must_use]
    pub fn record(&self) -> [String; 3] {
        [self.created(), self.last_activity(), self.tracked()]
    }
}
