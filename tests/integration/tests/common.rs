//! Common test utilities and fixtures.

use std::sync::Arc;

use stash_cache::{KeyValueStore, ManualClock, MemoryStore};
use stash_cache_redis::{RedisConfig, RedisStore};
use stash_session::{Session, SessionConfig, SessionFactory, TokenJar, DEFAULT_TOKEN_NAME};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::redis::Redis;

/// Arbitrary fixed start time for simulated clocks.
pub const START: i64 = 1_700_000_000;

/// Installs a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("stash_session=debug,stash_cache=debug")
        .with_test_writer()
        .try_init();
}

/// Session dependencies over an in-process store and a simulated clock.
pub struct TestEnv {
    /// Clock shared by the store and the sessions.
    pub clock: Arc<ManualClock>,
    /// Shared store.
    pub store: Arc<MemoryStore>,
    /// Factory handing out per-request sessions.
    pub sessions: SessionFactory,
}

impl TestEnv {
    /// Creates an environment with default session settings.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates an environment with `config`.
    pub fn with_config(config: SessionConfig) -> Self {
        init_tracing();

        let clock = Arc::new(ManualClock::new(START));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let sessions = SessionFactory::new(store.clone())
            .with_clock(clock.clone())
            .with_config(config);

        Self {
            clock,
            store,
            sessions,
        }
    }
}

/// A browser that remembers the session token between requests.
pub struct Browser {
    token: Option<String>,
}

impl Browser {
    /// Creates a browser with no cookies.
    pub const fn new() -> Self {
        Self { token: None }
    }

    /// Runs one request: builds the request's jar from the remembered token,
    /// hands the session to `handler`, then applies the tokens the response
    /// wrote, dropping any written with a non-positive lifetime.
    pub async fn request<F, Fut, T>(&mut self, sessions: &SessionFactory, handler: F) -> T
    where
        F: FnOnce(Session<Arc<TokenJar>>) -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let jar = match &self.token {
            Some(token) => TokenJar::new().with_token(DEFAULT_TOKEN_NAME, token.clone()),
            None => TokenJar::new(),
        };
        let jar = Arc::new(jar);

        let result = handler(sessions.session(Arc::clone(&jar))).await;

        if let Some(written) = jar.written().remove(DEFAULT_TOKEN_NAME) {
            self.token = written.is_live().then_some(written.value);
        }
        result
    }

    /// Returns the remembered session token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// A Redis container and a store connected to it.
pub struct RedisEnv {
    _container: ContainerAsync<Redis>,
    /// Store connected to the container.
    pub store: Arc<RedisStore>,
}

impl RedisEnv {
    /// Starts Redis and connects a store.
    pub async fn new() -> anyhow::Result<Self> {
        init_tracing();

        let container = Redis::default().start().await?;
        let port = container.get_host_port_ipv4(6379).await?;

        let config = RedisConfig::default().host("127.0.0.1").port(port);
        let store = Arc::new(RedisStore::new(config).await?);

        Ok(Self {
            _container: container,
            store,
        })
    }

    /// Returns the store as the trait object sessions consume.
    pub fn dyn_store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }
}
