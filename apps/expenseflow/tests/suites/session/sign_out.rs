//! Sign-out clears local state whatever the identity service says.

use expenseflow::domain::Role;
use expenseflow::error::AppError;
use expenseflow::identity::SessionEvent;
use expenseflow::services::Severity;
use expenseflow::state::SessionState;
use expenseflow::test_support::fixtures::session_for;

use crate::common::{authenticated, Harness};

#[tokio::test]
async fn sign_out_clears_the_snapshot() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    h.start().await;
    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    h.wait_until(authenticated(&alice)).await;

    h.store.sign_out().await.expect("sign-out never fails");

    let snapshot = h.store.snapshot();
    assert_eq!(snapshot.state(), &SessionState::Unauthenticated);
    assert!(snapshot.is_ready());
    assert!(snapshot.roles().is_empty());
    assert_eq!(h.identity.sign_out_calls(), 1);
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn remote_failure_still_clears_local_state() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Manager]);
    h.identity
        .fail_sign_out(AppError::unavailable("network unreachable"));
    h.start().await;
    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    h.wait_until(authenticated(&alice)).await;

    let result = h.store.sign_out().await;

    assert!(result.is_ok());
    let snapshot = h.store.snapshot();
    assert!(snapshot.user().is_none());
    assert!(snapshot.session().is_none());
    assert!(snapshot.profile().is_none());

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Destructive);
}

#[tokio::test]
async fn sign_out_while_enrichment_is_in_flight() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    let gate = h.data.hold(alice.user_id());
    h.start().await;
    h.identity.emit(SessionEvent::signed_in(alice.clone()));
    h.wait_until(|snap| snap.user().is_some()).await;

    h.store.sign_out().await.expect("sign-out never fails");
    gate.open();
    h.store.settled().await;

    assert_eq!(h.store.snapshot().state(), &SessionState::Unauthenticated);
}

#[tokio::test]
async fn sign_out_before_the_probe_lands_wins() {
    let h = Harness::new();
    let alice = session_for("alice@example.test");
    h.data.add_user(&alice, &[Role::Admin]);
    h.identity.set_probe(Ok(Some(alice.clone())));
    let probe_gate = h.identity.hold_probe();
    h.identity
        .fail_sign_out(AppError::unavailable("network unreachable"));
    h.start().await;

    h.store.sign_out().await.expect("sign-out never fails");
    probe_gate.open();
    h.store.settled().await;

    assert_eq!(h.store.snapshot().state(), &SessionState::Unauthenticated);
    assert_eq!(h.data.profile_calls(), 0);
}
