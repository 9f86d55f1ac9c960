//! Per-request session handle.

use std::sync::Arc;

use stash_cache::{CacheError, Clock, KeyValueStore, SystemClock};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::keys::{SessionKeys, SEPARATOR};
use crate::token::TokenCarrier;
use crate::tracked::TrackedKeys;

/// Shared session dependencies.
///
/// Build one per process and call [`SessionFactory::session`] for every
/// inbound request. Cloning is cheap; the store, clock and identifier
/// generator are reference counted.
#[derive(Clone)]
pub struct SessionFactory {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: SessionConfig,
}

impl SessionFactory {
    /// Creates a factory over `store` with default configuration, the wall
    /// clock and random identifiers.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIdGenerator::default()),
            config: SessionConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the shared store.
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Binds a session to the token carrier of one request.
    #[must_use]
    pub fn session<C: TokenCarrier>(&self, carrier: C) -> Session<C> {
        Session {
            carrier,
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
            config: self.config.clone(),
        }
    }
}

impl std::fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Session state for one request.
///
/// Values live in the shared store under keys derived from the identifier
/// the client presents (see [`crate::keys`]). The handle itself holds no
/// session data, so it is cheap to create per request and is not meant to be
/// shared between tasks.
///
/// Two requests racing on the same identifier are not serialized: writes to
/// one value are last-writer-wins, and the tracked name list is updated with
/// a plain read-modify-write, so concurrent `set` calls can drop a name from
/// it.
pub struct Session<C> {
    carrier: C,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: SessionConfig,
}

impl<C: TokenCarrier> Session<C> {
    /// Creates a session over `store` with default settings.
    #[must_use]
    pub fn new(carrier: C, store: Arc<dyn KeyValueStore>) -> Self {
        SessionFactory::new(store).session(carrier)
    }

    /// Returns the token carrier.
    #[must_use]
    pub const fn carrier(&self) -> &C {
        &self.carrier
    }

    /// Gives the token carrier back, typically to write the response.
    #[must_use]
    pub fn into_carrier(self) -> C {
        self.carrier
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the identifier presented by the client, if any.
    ///
    /// The identifier may belong to a session that has already timed out.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.carrier
            .read_signed(&self.config.token_name)
            .filter(|id| !id.is_empty())
    }

    /// Applies the inactivity policy to the current request.
    ///
    /// A session is timed out when the request carries no identifier, when
    /// its last-activity entry is missing or unparsable, or when that
    /// timestamp plus the timeout window lies in the past. A store failure
    /// while reading it also counts as timed out here.
    pub async fn is_timed_out(&self) -> bool {
        let Some(id) = self.id() else {
            return true;
        };
        match self.id_timed_out(&id).await {
            Ok(timed_out) => timed_out,
            Err(e) => {
                tracing::debug!(session = short(&id), error = %e, "last activity unreadable");
                true
            }
        }
    }

    /// Stores `value` under `name`, starting a new session if needed.
    ///
    /// Without a live session a fresh identifier is issued and written to
    /// the client token. A timed-out session has its entries deleted before
    /// being replaced.
    ///
    /// ## Errors
    ///
    /// - `InvalidKey` if `name` is empty or contains `:`
    /// - `IdGeneration` if a new identifier was needed and none could be made
    /// - `Store` if the store fails; the current session is left untouched
    ///   when its activity cannot be read
    pub async fn set(&self, name: &str, value: &str) -> SessionResult<()> {
        validate_name(name)?;

        let id = match self.id() {
            Some(id) => {
                if self.id_timed_out(&id).await? {
                    tracing::debug!(session = short(&id), "replacing timed out session");
                    self.discard(&id).await;
                    self.issue().await?
                } else {
                    id
                }
            }
            None => self.issue().await?,
        };

        let keys = SessionKeys::new(&id);
        self.store
            .set(&keys.value(name), value, self.config.expiration())
            .await?;
        self.touch(&id).await?;

        let mut tracked = self.load_tracked(&id).await?;
        tracked.insert(name);
        self.save_tracked(&id, &tracked).await
    }

    /// Reads the value stored under `name`.
    ///
    /// A successful lookup of the session refreshes its activity, even when
    /// the value itself turns out to be missing.
    ///
    /// ## Errors
    ///
    /// - `NoSession` if the request carries no identifier
    /// - `TimedOut` if the session is past its inactivity window
    /// - `NotFound` if `name` was never set or has expired
    /// - `Store` if the store fails
    pub async fn get(&self, name: &str) -> SessionResult<String> {
        let id = self.active_id().await?;
        self.touch(&id).await?;

        match self.store.get(&SessionKeys::new(&id).value(name)).await {
            Ok(value) => Ok(value),
            Err(CacheError::NotFound) => Err(SessionError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the values stored under `names`.
    ///
    /// Does nothing without an identifier. Activity is refreshed only if the
    /// session is still live, so deleting from a timed-out session never
    /// revives it. The names are dropped from the tracked list as well.
    /// Store failures are logged, not returned.
    pub async fn delete<S>(&self, names: &[S])
    where
        S: AsRef<str> + Sync,
    {
        let Some(id) = self.id() else {
            return;
        };

        match self.id_timed_out(&id).await {
            Ok(false) => {
                if let Err(e) = self.touch(&id).await {
                    tracing::warn!(session = short(&id), error = %e, "failed to refresh session activity");
                }
            }
            Ok(true) => {}
            Err(e) => {
                tracing::warn!(session = short(&id), error = %e, "failed to read session activity");
            }
        }

        if names.is_empty() {
            return;
        }

        let keys = SessionKeys::new(&id);
        let doomed: Vec<String> = names.iter().map(|n| keys.value(n.as_ref())).collect();
        if let Err(e) = self.store.delete_many(&doomed).await {
            tracing::warn!(session = short(&id), error = %e, "failed to delete session values");
        }

        match self.load_tracked(&id).await {
            Ok(mut tracked) => {
                let mut changed = false;
                for name in names {
                    changed |= tracked.remove(name.as_ref());
                }
                if changed {
                    if let Err(e) = self.save_tracked(&id, &tracked).await {
                        tracing::warn!(session = short(&id), error = %e, "failed to update tracked keys");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(session = short(&id), error = %e, "failed to read tracked keys");
            }
        }
    }

    /// Removes every value stored under the session.
    ///
    /// The session itself stays alive and, like [`Session::delete`], counts
    /// the call as activity. Calling it again on an emptied session deletes
    /// nothing more.
    pub async fn clear(&self) {
        let Some(id) = self.id() else {
            return;
        };

        let tracked = match self.load_tracked(&id).await {
            Ok(tracked) => tracked,
            Err(e) => {
                tracing::warn!(session = short(&id), error = %e, "failed to read tracked keys");
                return;
            }
        };
        if !tracked.is_empty() {
            tracing::debug!(session = short(&id), keys = tracked.len(), "clearing session");
        }
        self.delete(&tracked.into_vec()).await;
    }

    /// Ends the session: every entry is deleted and the client token is
    /// expired.
    pub async fn destroy(&self) {
        let Some(id) = self.id() else {
            return;
        };

        tracing::debug!(session = short(&id), "destroying session");
        self.discard(&id).await;
    }

    /// Returns when the live session was created, in epoch seconds.
    ///
    /// Does not count as activity.
    ///
    /// ## Errors
    ///
    /// - `NoSession` or `TimedOut` as for [`Session::get`]
    /// - `NotFound` if the creation entry is gone
    /// - `Store` if the store fails or the entry is not a timestamp
    pub async fn created_at(&self) -> SessionResult<i64> {
        let id = self.active_id().await?;
        let raw = match self.store.get(&SessionKeys::new(&id).created()).await {
            Ok(raw) => raw,
            Err(CacheError::NotFound) => {
                return Err(SessionError::NotFound("creation timestamp".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        raw.trim().parse().map_err(|_| {
            SessionError::Store(CacheError::Serialization(format!(
                "invalid creation timestamp {raw:?}"
            )))
        })
    }

    /// Returns the names stored under the live session, oldest first.
    ///
    /// Does not count as activity.
    ///
    /// ## Errors
    ///
    /// `NoSession` or `TimedOut` as for [`Session::get`], and `Store` if the
    /// store fails.
    pub async fn keys(&self) -> SessionResult<Vec<String>> {
        let id = self.active_id().await?;
        Ok(self.load_tracked(&id).await?.into_vec())
    }

    async fn active_id(&self) -> SessionResult<String> {
        let id = self.id().ok_or(SessionError::NoSession)?;
        if self.id_timed_out(&id).await? {
            tracing::debug!(session = short(&id), "session timed out");
            return Err(SessionError::TimedOut);
        }
        Ok(id)
    }

    /// Store failures other than a missing entry are returned, so a flaky
    /// read never replaces a live session.
    async fn id_timed_out(&self, id: &str) -> SessionResult<bool> {
        let raw = match self.store.get(&SessionKeys::new(id).last_activity()).await {
            Ok(raw) => raw,
            Err(CacheError::NotFound) => return Ok(true),
            Err(e) => return Err(e.into()),
        };

        let Ok(last_activity) = raw.trim().parse::<i64>() else {
            return Ok(true);
        };

        Ok(last_activity.saturating_add(self.config.timeout_i64()) < self.clock.now())
    }

    /// Generates an identifier, hands it to the client and writes the
    /// creation and last-activity entries.
    async fn issue(&self) -> SessionResult<String> {
        let id = self.ids.generate()?;
        self.carrier
            .write_signed(&self.config.token_name, &id, self.config.expiration_i64());

        let keys = SessionKeys::new(&id);
        let now = self.clock.now().to_string();
        let ttl = self.config.expiration();
        self.store.set(&keys.created(), &now, ttl).await?;
        self.store.set(&keys.last_activity(), &now, ttl).await?;

        tracing::debug!(session = short(&id), "issued session");
        Ok(id)
    }

    /// Deletes every entry of `id` and expires the client token.
    async fn discard(&self, id: &str) {
        let keys = SessionKeys::new(id);

        let mut doomed: Vec<String> = match self.load_tracked(id).await {
            Ok(tracked) => tracked.iter().map(|name| keys.value(name)).collect(),
            Err(e) => {
                tracing::warn!(session = short(id), error = %e, "failed to read tracked keys");
                Vec::new()
            }
        };
        doomed.extend(keys.record());

        if let Err(e) = self.store.delete_many(&doomed).await {
            tracing::warn!(session = short(id), error = %e, "failed to delete session entries");
        }
        self.carrier.write_signed(&self.config.token_name, "", -1);
    }

    async fn touch(&self, id: &str) -> SessionResult<()> {
        let now = self.clock.now().to_string();
        self.store
            .set(
                &SessionKeys::new(id).last_activity(),
                &now,
                self.config.expiration(),
            )
            .await?;
        Ok(())
    }

    async fn load_tracked(&self, id: &str) -> SessionResult<TrackedKeys> {
        match self.store.get(&SessionKeys::new(id).tracked()).await {
            Ok(stored) => Ok(TrackedKeys::parse(&stored)),
            Err(CacheError::NotFound) => Ok(TrackedKeys::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the tracked list, or removes it once empty. Every write
    /// renews its expiry alongside the values it lists.
    async fn save_tracked(&self, id: &str, tracked: &TrackedKeys) -> SessionResult<()> {
        let key = SessionKeys::new(id).tracked();
        if tracked.is_empty() {
            self.store.delete_many(&[key]).await?;
        } else {
            self.store
                .set(&key, &tracked.encode(), self.config.expiration())
                .await?;
        }
        Ok(())
    }
}

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> SessionResult<()> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(SessionError::InvalidKey(name.to_string()));
    }
    Ok(())
}

/// Identifier prefix safe to log.
fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
