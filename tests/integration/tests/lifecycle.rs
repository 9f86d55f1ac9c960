//! Session lifecycle across requests.

use stash_session::{SessionConfig, SessionError};

use crate::common::{Browser, TestEnv};

/// Walks the cart scenario: value round trip, inactivity timeout, and a
/// fresh identifier on the next write.
#[tokio::test]
async fn test_cart_survives_until_timeout() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let mut browser = Browser::new();

    browser
        .request(&env.sessions, |s| async move { s.set("cart", "3 items").await })
        .await?;
    let first = browser.token().map(str::to_string);
    assert!(first.is_some(), "First write should issue a token");

    let cart = browser
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await?;
    assert_eq!(cart, "3 items");

    env.clock.advance(3601);
    let err = browser
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::TimedOut), "got {err:?}");

    browser
        .request(&env.sessions, |s| async move { s.set("cart", "1 item").await })
        .await?;
    assert_ne!(
        browser.token().map(str::to_string),
        first,
        "Timed out session should be replaced"
    );

    let cart = browser
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await?;
    assert_eq!(cart, "1 item");

    Ok(())
}

#[tokio::test]
async fn test_first_visit_has_no_session() {
    let env = TestEnv::new();
    let mut browser = Browser::new();

    let err = browser
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::NoSession));
    assert!(browser.token().is_none());
}

#[tokio::test]
async fn test_regular_visits_never_time_out() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let mut browser = Browser::new();

    browser
        .request(&env.sessions, |s| async move { s.set("user", "ada").await })
        .await?;

    // Twelve hours of activity, one request every 50 minutes.
    for _ in 0..14 {
        env.clock.advance(50 * 60);
        let user = browser
            .request(&env.sessions, |s| async move { s.get("user").await })
            .await?;
        assert_eq!(user, "ada");
    }

    Ok(())
}

#[tokio::test]
async fn test_clear_then_logout() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let mut browser = Browser::new();

    browser
        .request(&env.sessions, |s| async move {
            s.set("cart", "3 items").await?;
            s.set("coupon", "SPRING").await?;
            s.set("cart", "4 items").await
        })
        .await?;

    let keys = browser
        .request(&env.sessions, |s| async move { s.keys().await })
        .await?;
    assert_eq!(keys, vec!["cart", "coupon"]);

    browser
        .request(&env.sessions, |s| async move {
            s.clear().await;
            s.clear().await;
        })
        .await;

    let err = browser
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    browser
        .request(&env.sessions, |s| async move { s.destroy().await })
        .await;
    assert!(browser.token().is_none(), "Logout should drop the token");
    assert!(env.store.is_empty(), "Logout should drop every entry");

    Ok(())
}

#[tokio::test]
async fn test_two_browsers_are_isolated() -> anyhow::Result<()> {
    let env = TestEnv::new();
    let mut alice = Browser::new();
    let mut bob = Browser::new();

    alice
        .request(&env.sessions, |s| async move { s.set("cart", "books").await })
        .await?;
    bob.request(&env.sessions, |s| async move { s.set("cart", "tools").await })
        .await?;

    assert_ne!(alice.token(), bob.token());

    let cart = alice
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await?;
    assert_eq!(cart, "books");

    let cart = bob
        .request(&env.sessions, |s| async move { s.get("cart").await })
        .await?;
    assert_eq!(cart, "tools");

    Ok(())
}

#[tokio::test]
async fn test_short_timeout_config() -> anyhow::Result<()> {
    let env = TestEnv::with_config(SessionConfig::new().timeout_secs(60));
    let mut browser = Browser::new();

    browser
        .request(&env.sessions, |s| async move { s.set("step", "2").await })
        .await?;

    env.clock.advance(61);
    let timed_out = browser
        .request(&env.sessions, |s| async move { s.is_timed_out().await })
        .await;
    assert!(timed_out);

    Ok(())
}
