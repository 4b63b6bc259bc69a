//! After teardown the store ignores every late event and result.

use std::time::Duration;

use expenseflow::domain::Role;
use expenseflow::identity::SessionEvent;
use expenseflow::test_support::fixtures::session_for;

use crate::common::{authenticating, Harness};

#[tokio::test]
async fn late_enrichment_after_shutdown_is_a_noop() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    let gate = h.data.hold(alice.user_id());
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    let before = h.wait_until(authenticating(&alice)).await;

    h.store.shutdown();
    gate.open();
    h.store.settled().await;

    assert!(!h.store.is_live());
    assert_eq!(h.store.snapshot(), before);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn events_after_shutdown_are_ignored() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    h.start().await;
    let before = h.wait_until(|snap| snap.is_ready()).await;

    h.store.shutdown();
    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(h.store.snapshot(), before);
    assert_eq!(h.data.profile_calls(), 0);
}

#[tokio::test]
async fn start_after_shutdown_fails() {
    let h = Harness::new();
    h.store.shutdown();
    assert!(h.store.start().await.is_err());
}

#[tokio::test]
async fn second_start_fails() {
    let h = Harness::new();
    h.start().await;
    assert!(h.store.start().await.is_err());
}

#[tokio::test]
async fn dropping_the_store_closes_watchers() {
    let h = Harness::new();
    let mut rx = h.store.watch();
    h.start().await;

    drop(h);

    // Background tasks release the store once they observe the teardown.
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await;
    assert!(closed.is_ok(), "watch channel should close once the store is gone");
}

#[tokio::test]
async fn shutdown_during_subscribe_leaves_no_subscription_behind() {
    let h = Harness::new();
    let gate = h.identity.hold_subscribe();

    let (started, ()) = tokio::join!(h.store.start(), async {
        // Let `start` reach the held subscribe first.
        tokio::task::yield_now().await;
        h.store.shutdown();
        gate.open();
    });

    assert!(started.is_err(), "start must not succeed once shut down");
    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while !h.identity.stream_closed() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;
    assert!(closed.is_ok(), "the session stream should be released");
}

#[tokio::test]
async fn dropping_a_started_store_releases_the_stream() {
    let h = Harness::new();
    h.start().await;
    let identity = h.identity.clone();
    assert!(!identity.stream_closed());

    drop(h);

    let closed = tokio::time::timeout(Duration::from_secs(5), async {
        while !identity.stream_closed() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await;
    assert!(closed.is_ok(), "the session stream should be released");
}
