#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::Duration;

use expenseflow::domain::{Session, UserId};
use expenseflow::services::{IdentityEnrichmentService, SessionStore};
use expenseflow::state::{SessionSnapshot, SessionState};
use expenseflow::test_support::{FakeDataStore, FakeIdentityService, RecordingNotifier};
use tokio::sync::watch;

// Logging is auto-installed for most test binaries
#[ctor::ctor]
fn init_logging() {
    expenseflow_test_support::logging::init();
}

const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// A session store wired to in-memory collaborators.
pub struct Harness {
    pub identity: Arc<FakeIdentityService>,
    pub data: Arc<FakeDataStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: SessionStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let identity = Arc::new(FakeIdentityService::new());
        let data = Arc::new(FakeDataStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let enrichment = Arc::new(IdentityEnrichmentService::new(data.clone(), timeout));
        let store = SessionStore::new(identity.clone(), enrichment, notifier.clone());
        Self {
            identity,
            data,
            notifier,
            store,
        }
    }

    pub async fn start(&self) {
        self.store.start().await.expect("session store should start");
    }

    pub async fn wait_until<F>(&self, pred: F) -> SessionSnapshot
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        wait_until(&mut self.store.watch(), pred).await
    }

    /// Wait until the store's pump has pulled `count` events off the stream.
    pub async fn wait_delivered(&self, count: usize) {
        tokio::time::timeout(WAIT_LIMIT, async {
            while self.identity.delivered() < count {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("timed out waiting for session events to be delivered");
    }
}

pub async fn wait_until<F>(rx: &mut watch::Receiver<SessionSnapshot>, pred: F) -> SessionSnapshot
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    let snapshot = tokio::time::timeout(WAIT_LIMIT, rx.wait_for(pred))
        .await
        .expect("timed out waiting for session state")
        .expect("session store dropped");
    (*snapshot).clone()
}

pub fn authenticating(session: &Session) -> impl Fn(&SessionSnapshot) -> bool {
    let user_id = session.user_id();
    move |snap: &SessionSnapshot| {
        matches!(snap.state(), SessionState::Authenticating { .. }) && user_of(snap) == Some(user_id)
    }
}

pub fn authenticated(session: &Session) -> impl Fn(&SessionSnapshot) -> bool {
    let user_id = session.user_id();
    move |snap: &SessionSnapshot| {
        matches!(snap.state(), SessionState::Authenticated { .. }) && user_of(snap) == Some(user_id)
    }
}

pub fn unenriched(session: &Session) -> impl Fn(&SessionSnapshot) -> bool {
    let user_id = session.user_id();
    move |snap: &SessionSnapshot| {
        matches!(snap.state(), SessionState::Unenriched { .. }) && user_of(snap) == Some(user_id)
    }
}

pub fn unauthenticated(snap: &SessionSnapshot) -> bool {
    matches!(snap.state(), SessionState::Unauthenticated)
}

pub fn user_of(snap: &SessionSnapshot) -> Option<UserId> {
    snap.user().map(|user| user.id)
}

/// The `(user, profile, roles)` triple belongs to one user or is absent.
pub fn assert_consistent(snap: &SessionSnapshot) {
    match snap.profile() {
        Some(profile) => assert_eq!(
            Some(profile.id),
            user_of(snap),
            "profile must belong to the session user"
        ),
        None => assert!(
            snap.roles().is_empty(),
            "roles without a profile: {:?}",
            snap.state()
        ),
    }
    if snap.user().is_none() {
        assert!(snap.profile().is_none());
        assert!(snap.roles().is_empty());
    }
}
