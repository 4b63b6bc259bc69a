//! Enrichment failure degrades to a signed-in but blank session.

use std::time::Duration;

use expenseflow::domain::Role;
use expenseflow::error::AppError;
use expenseflow::errors::ErrorCode;
use expenseflow::identity::SessionEvent;
use expenseflow::services::Notice;
use expenseflow::test_support::fixtures::session_for;

use crate::common::{authenticated, unenriched, Harness};

#[tokio::test]
async fn missing_profile_leaves_store_ready_with_empty_roles() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    let snapshot = h.wait_until(unenriched(&alice)).await;

    assert!(snapshot.is_ready());
    assert_eq!(snapshot.user().map(|u| u.id), Some(alice.user_id()));
    assert!(snapshot.profile().is_none());
    assert!(snapshot.roles().is_empty());
    assert_eq!(
        snapshot.enrichment_error().map(|e| e.code()),
        Some(ErrorCode::ProfileNotFound)
    );
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::error("Failed to load user profile")]
    );
}

#[tokio::test]
async fn role_lookup_failure_is_an_enrichment_failure() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    h.data
        .fail_roles(alice.user_id(), AppError::unavailable("connection reset"));
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    let snapshot = h.wait_until(unenriched(&alice)).await;

    assert!(!snapshot.roles().contains(Role::Admin));
    let failure = snapshot.enrichment_error().expect("failure is recorded");
    assert_eq!(failure.code(), ErrorCode::EnrichmentFailed);
    assert!(failure.is_retryable());
}

#[tokio::test]
async fn profile_for_another_user_is_rejected() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    let mallory = session_for("mallory@example.test");
    let foreign = h.data.add_user(&mallory, &[Role::Admin]);
    h.data.put_profile(alice.user_id(), foreign);
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    let snapshot = h.wait_until(unenriched(&alice)).await;

    assert!(snapshot.profile().is_none());
    assert_eq!(
        snapshot.enrichment_error().map(|e| e.code()),
        Some(ErrorCode::ProfileMismatch)
    );
}

#[tokio::test]
async fn enrichment_timeout_degrades_instead_of_hanging() {
    let h = Harness::with_timeout(Some(Duration::from_millis(50)));
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Employee]);
    let _never_opened = h.data.hold(alice.user_id());
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    let snapshot = h.wait_until(unenriched(&alice)).await;

    assert_eq!(
        snapshot.enrichment_error().map(|e| e.code()),
        Some(ErrorCode::EnrichmentTimeout)
    );
}

#[tokio::test]
async fn retry_after_the_store_recovers() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Manager]);
    h.data
        .fail_profile(alice.user_id(), AppError::unavailable("connection reset"));
    h.start().await;

    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    h.wait_until(unenriched(&alice)).await;

    h.data.heal(alice.user_id());
    h.store.retry_enrichment().expect("a user is signed in");
    let snapshot = h.wait_until(authenticated(&alice)).await;

    assert!(snapshot.roles().contains(Role::Manager));
    assert!(snapshot.enrichment_error().is_none());
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn retry_without_a_user_is_rejected() {
    let h = Harness::new();
    h.start().await;
    h.wait_until(|snap| snap.is_ready()).await;

    let err = h
        .store
        .retry_enrichment()
        .expect_err("nobody is signed in");
    assert_eq!(err.code(), ErrorCode::NotSignedIn);
}
