// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store lifecycle and expiry monitor tests.

use osdatum::events::{AppEvent, EventBus};
use osdatum::models::{Credential, UserProfile};
use osdatum::services::CredentialStore;
use std::time::Duration;

mod common;
use common::make_token;

fn profile() -> UserProfile {
    UserProfile {
        display_name: "Test User".to_string(),
        email: "user@example.com".to_string(),
        photo_url: None,
    }
}

#[tokio::test]
async fn test_set_session_stores_and_announces() {
    let bus = EventBus::new();
    let mut events = bus.subscribe();
    let store = CredentialStore::new(bus);

    store.set_session(Credential::new(make_token(3600)), Some(profile()));

    assert!(store.credential().is_some());
    assert_eq!(store.profile().unwrap().email, "user@example.com");
    assert_eq!(events.try_recv().unwrap(), AppEvent::AuthChanged);
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let bus = EventBus::new();
    let store = CredentialStore::new(bus.clone());
    store.set_session(Credential::new(make_token(3600)), None);

    let mut events = bus.subscribe();

    assert!(store.clear(), "first clear removes the session");
    assert!(!store.clear(), "second clear is a no-op");

    assert_eq!(events.try_recv().unwrap(), AppEvent::AuthChanged);
    assert!(
        events.try_recv().is_err(),
        "the no-op clear must not announce anything"
    );
    assert!(store.credential().is_none());
    assert!(store.profile().is_none());
}

#[tokio::test]
async fn test_session_file_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "osdatum-session-roundtrip-{}.json",
        std::process::id()
    ));

    let token = make_token(3600);
    {
        let store = CredentialStore::with_persistence(EventBus::new(), &path);
        store.set_session(Credential::new(token.clone()), Some(profile()));
    }

    // A fresh store on the same path picks the session back up.
    let store = CredentialStore::with_persistence(EventBus::new(), &path);
    assert_eq!(store.credential().unwrap().as_str(), token);
    assert_eq!(store.profile().unwrap().display_name, "Test User");

    store.clear();
    assert!(!path.exists(), "clear removes the session file");
}

#[tokio::test]
async fn test_malformed_session_file_is_discarded() {
    let path = std::env::temp_dir().join(format!(
        "osdatum-session-bad-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, "{ not a session").unwrap();

    let store = CredentialStore::with_persistence(EventBus::new(), &path);
    assert!(store.credential().is_none());

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_monitor_clears_an_already_expired_session() {
    let bus = EventBus::new();
    let store = CredentialStore::new(bus.clone());
    store.set_session(Credential::new(make_token(-60)), Some(profile()));

    let mut events = bus.subscribe();
    let handle = store.spawn_expiry_monitor(Duration::from_millis(50));

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("monitor should clear the expired session")
        .unwrap();

    assert_eq!(event, AppEvent::AuthChanged);
    assert!(store.credential().is_none());
    assert!(store.profile().is_none());

    handle.abort();
}

#[tokio::test]
async fn test_monitor_expires_a_session_at_its_deadline() {
    let bus = EventBus::new();
    let store = CredentialStore::new(bus.clone());
    // Expires in one second; the periodic check would also catch it.
    store.set_session(Credential::new(make_token(1)), None);

    let mut events = bus.subscribe();
    let handle = store.spawn_expiry_monitor(Duration::from_millis(200));

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("monitor should expire the session")
        .unwrap();

    assert_eq!(event, AppEvent::AuthChanged);
    assert!(store.credential().is_none());

    handle.abort();
}

#[tokio::test]
async fn test_monitor_leaves_a_live_session_alone() {
    let bus = EventBus::new();
    let store = CredentialStore::new(bus.clone());
    store.set_session(Credential::new(make_token(3600)), None);

    let mut events = bus.subscribe();
    let handle = store.spawn_expiry_monitor(Duration::from_millis(20));

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(store.credential().is_some());
    assert!(events.try_recv().is_err(), "no announcement for a live session");

    handle.abort();
}

#[tokio::test]
async fn test_monitor_races_cleanly_with_explicit_clear() {
    let bus = EventBus::new();
    let store = CredentialStore::new(bus.clone());
    store.set_session(Credential::new(make_token(-60)), None);

    let handle = store.spawn_expiry_monitor(Duration::from_millis(10));

    // Explicit logout while the monitor is running; whichever side wins,
    // exactly one announcement goes out and the other is a no-op.
    store.clear();
    let mut events = bus.subscribe();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(store.credential().is_none());
    assert!(
        events.try_recv().is_err(),
        "a cleared store must stay silent"
    );

    handle.abort();
}
