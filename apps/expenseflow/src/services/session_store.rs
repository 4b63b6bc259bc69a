//! Session store: owns the authoritative session snapshot and keeps it in
//! step with the identity service's session-change stream.
//!
//! Every write to the snapshot goes through `watch::Sender::send_if_modified`.
//! Its closure runs under the channel's write lock, so the liveness check, the
//! subject check and the write happen as one step. Stream events, the startup
//! probe, enrichment results, sign-out and teardown all funnel through it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::domain::Session;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::identity::{IdentityService, SessionEvent, SessionEvents};
use crate::services::enrichment::{Enrichment, IdentityEnrichmentService};
use crate::services::notifications::{Notice, Notifier};
use crate::state::session_state::Subject;
use crate::state::{SessionSnapshot, SessionState};

const ENRICHMENT_FAILED_NOTICE: &str = "Failed to load user profile";
const SIGN_OUT_FAILED_NOTICE: &str = "Sign-out could not be confirmed; you have been signed out locally";

struct Inner {
    snapshot: watch::Sender<SessionSnapshot>,
    live: AtomicBool,
    tasks: TaskTracker,
    identity: Arc<dyn IdentityService>,
    enrichment: Arc<IdentityEnrichmentService>,
    notifier: Arc<dyn Notifier>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

/// Single writer of the session snapshot.
///
/// Not `Clone`: share it behind an `Arc`. Dropping the store tears it down.
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        enrichment: Arc<IdentityEnrichmentService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                snapshot: watch::Sender::new(SessionSnapshot::default()),
                live: AtomicBool::new(true),
                tasks: TaskTracker::new(),
                identity,
                enrichment,
                notifier,
                pump: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to the session-change stream and issue the one-time
    /// current-session probe. Both feed the same guarded writer; the probe
    /// runs in the background and loses to any stream event applied first.
    pub async fn start(&self) -> Result<(), AppError> {
        if !self.is_live() {
            return Err(AppError::internal("session store has been shut down"));
        }
        if self.inner.pump.lock().is_some() {
            return Err(AppError::internal("session store already started"));
        }

        let events = self.inner.identity.subscribe().await?;
        let pump = tokio::spawn(Arc::clone(&self.inner).pump(events));
        {
            // Teardown flips `live` while holding this slot, so the check and
            // the install cannot straddle a shutdown.
            let mut slot = self.inner.pump.lock();
            if !self.is_live() {
                pump.abort();
                return Err(AppError::internal("session store has been shut down"));
            }
            if slot.is_some() {
                pump.abort();
                return Err(AppError::internal("session store already started"));
            }
            *slot = Some(pump);
        }

        let inner = Arc::clone(&self.inner);
        self.inner.tasks.spawn(async move {
            let probed = inner.identity.current_session().await;
            inner.apply_probe(probed);
        });

        info!("Session store started");
        Ok(())
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver that observes every snapshot change.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::Acquire)
    }

    /// Sign out remotely, then clear local state whatever the remote outcome.
    ///
    /// A remote failure is logged and reported to the notifier, never returned.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        if let Err(e) = self.inner.identity.sign_out().await {
            warn!(code = %e.code(), error = %e, "Remote sign-out failed; clearing local session");
            self.inner.notifier.notify(Notice::error(SIGN_OUT_FAILED_NOTICE));
        }
        self.inner.clear_session();
        Ok(())
    }

    /// Re-run enrichment for the signed-in user.
    ///
    /// Moves the store back to `Authenticating` under a new epoch, so any
    /// earlier fetch still in flight is discarded when it lands. Must be
    /// called from within a tokio runtime.
    pub fn retry_enrichment(&self) -> Result<(), AppError> {
        let mut dispatch = None;
        let live = &self.inner.live;
        self.inner.snapshot.send_if_modified(|snap| {
            if !live.load(Ordering::Acquire) {
                return false;
            }
            match snap.session().cloned() {
                Some(session) => {
                    dispatch = Some(snap.begin_authenticating(session));
                    true
                }
                None => false,
            }
        });

        match dispatch {
            Some(subject) => {
                info!(user_id = %subject.user_id, epoch = subject.epoch, "Retrying enrichment");
                self.inner.dispatch_enrichment(subject);
                Ok(())
            }
            None => Err(AppError::invalid(
                ErrorCode::NotSignedIn,
                "no signed-in user to enrich",
            )),
        }
    }

    /// Wait until every dispatched enrichment fetch and the startup probe
    /// have landed (applied or discarded).
    pub async fn settled(&self) {
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        if self.is_live() {
            self.inner.tasks.reopen();
        }
    }

    /// Tear down: unsubscribe from the stream and turn every later write into
    /// a no-op. Idempotent.
    pub fn shutdown(&self) {
        self.inner.teardown();
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl Inner {
    async fn pump(self: Arc<Self>, mut events: SessionEvents) {
        while let Some(event) = events.next().await {
            if !self.live.load(Ordering::Acquire) {
                break;
            }
            debug!(
                kind = ?event.kind,
                has_session = event.session.is_some(),
                "Session event received"
            );
            self.apply_event(event);
        }
        debug!("Session event stream ended");
    }

    fn apply_event(self: &Arc<Self>, event: SessionEvent) {
        let mut dispatch = None;
        self.snapshot.send_if_modified(|snap| {
            if !self.live.load(Ordering::Acquire) {
                return false;
            }
            snap.probe_superseded = true;
            match event.session {
                Some(session) => {
                    dispatch = Some(snap.begin_authenticating(session));
                    true
                }
                None => sign_out_locally(snap),
            }
        });

        if let Some(subject) = dispatch {
            debug!(user_id = %subject.user_id, epoch = subject.epoch, "Authenticating");
            self.dispatch_enrichment(subject);
        }
    }

    fn apply_probe(self: &Arc<Self>, probed: Result<Option<Session>, AppError>) {
        if let Err(e) = &probed {
            warn!(code = %e.code(), error = %e, "Current-session probe failed");
        }

        let mut dispatch = None;
        let applied = self.snapshot.send_if_modified(|snap| {
            if !self.live.load(Ordering::Acquire) || snap.probe_superseded {
                return false;
            }
            match probed {
                Ok(Some(session)) => {
                    dispatch = Some(snap.begin_authenticating(session));
                    true
                }
                Ok(None) => sign_out_locally(snap),
                Err(_) => {
                    matches!(snap.state(), SessionState::Uninitialized) && sign_out_locally(snap)
                }
            }
        });

        if !applied {
            debug!("Probe result superseded");
        }
        if let Some(subject) = dispatch {
            self.dispatch_enrichment(subject);
        }
    }

    fn dispatch_enrichment(self: &Arc<Self>, subject: Subject) {
        let inner = Arc::clone(self);
        self.tasks.spawn(async move {
            let result = inner.enrichment.fetch_enrichment(subject.user_id).await;
            inner.apply_enrichment(subject, result);
        });
    }

    fn apply_enrichment(&self, subject: Subject, result: Result<Enrichment, AppError>) {
        let mut failed = false;
        let applied = self.snapshot.send_if_modified(|snap| {
            if !self.live.load(Ordering::Acquire) || snap.subject() != Some(subject) {
                return false;
            }
            let Some(session) = snap.session().cloned() else {
                return false;
            };
            match result {
                Ok(Enrichment { profile, roles }) => snap.set_state(SessionState::Authenticated {
                    session,
                    profile,
                    roles,
                }),
                Err(failure) => {
                    failed = true;
                    snap.set_state(SessionState::Unenriched { session, failure });
                }
            }
            true
        });

        if !applied {
            debug!(
                user_id = %subject.user_id,
                epoch = subject.epoch,
                "Discarding stale enrichment result"
            );
            return;
        }
        if failed {
            self.notifier.notify(Notice::error(ENRICHMENT_FAILED_NOTICE));
        } else {
            info!(user_id = %subject.user_id, "Session authenticated");
        }
    }

    fn clear_session(&self) {
        let cleared = self.snapshot.send_if_modified(|snap| {
            if !self.live.load(Ordering::Acquire) {
                return false;
            }
            snap.probe_superseded = true;
            sign_out_locally(snap)
        });
        if cleared {
            info!("Signed out");
        }
    }

    fn teardown(&self) {
        let mut slot = self.pump.lock();
        let mut was_live = false;
        self.snapshot.send_if_modified(|_| {
            was_live = self.live.swap(false, Ordering::AcqRel);
            false
        });
        if !was_live {
            return;
        }
        if let Some(pump) = slot.take() {
            pump.abort();
        }
        drop(slot);
        self.tasks.close();
        debug!("Session store torn down");
    }
}

/// Move to `Unauthenticated`; returns whether the state changed.
fn sign_out_locally(snap: &mut SessionSnapshot) -> bool {
    if matches!(snap.state(), SessionState::Unauthenticated) {
        return false;
    }
    snap.set_state(SessionState::Unauthenticated);
    true
}
