//! Redis adapter tests against an ephemeral container.

use std::time::Duration;

use stash_cache::{CacheError, KeyValueStore};
use stash_session::{SessionFactory, SessionKeys, TokenJar};

use crate::common::RedisEnv;

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_redis_set_get_delete() -> anyhow::Result<()> {
    let env = RedisEnv::new().await?;

    env.store
        .set("greeting", "hello", Duration::from_secs(60))
        .await?;
    env.store.set("other", "x", Duration::from_secs(60)).await?;
    assert_eq!(env.store.get("greeting").await?, "hello");

    env.store
        .delete_many(&["greeting".to_string(), "missing".to_string()])
        .await?;
    env.store.delete_many(&[]).await?;

    assert_eq!(env.store.get("greeting").await, Err(CacheError::NotFound));
    assert_eq!(env.store.get("other").await?, "x");

    Ok(())
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_redis_entries_expire() -> anyhow::Result<()> {
    let env = RedisEnv::new().await?;

    env.store.set("short", "1", Duration::from_secs(1)).await?;
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(env.store.get("short").await, Err(CacheError::NotFound));

    Ok(())
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_session_over_redis() -> anyhow::Result<()> {
    let env = RedisEnv::new().await?;
    let sessions = SessionFactory::new(env.dyn_store());

    let jar = TokenJar::new();
    let session = sessions.session(&jar);
    session.set("cart", "3 items").await?;
    session.set("coupon", "SPRING").await?;
    assert_eq!(session.get("cart").await?, "3 items");

    let id = session.id().expect("token issued");
    let keys = SessionKeys::new(&id);
    assert_eq!(env.store.get(&keys.tracked()).await?, "cart:coupon");
    assert_eq!(env.store.get(&keys.value("cart")).await?, "3 items");

    session.destroy().await;
    assert_eq!(
        env.store.get(&keys.last_activity()).await,
        Err(CacheError::NotFound)
    );

    Ok(())
}
