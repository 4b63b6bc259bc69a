//! Scriptable in-memory identity service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::fixtures::session_for;
use super::gate::Gate;
use crate::domain::{Session, UserId};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::identity::{
    IdentityService, SessionEvent, SessionEventKind, SessionEvents, SignUpMetadata, SignUpOutcome,
};

struct Account {
    password: String,
    session: Session,
}

/// Identity service whose session stream is driven by the test.
///
/// `emit` pushes events onto the stream handed out by `subscribe`. Successful
/// sign-in, sign-up and sign-out also emit the matching event, the way a real
/// identity service announces session changes.
pub struct FakeIdentityService {
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<SessionEvent>>>,
    probe: Mutex<Result<Option<Session>, AppError>>,
    probe_gate: Mutex<Option<Gate>>,
    subscribe_gate: Mutex<Option<Gate>>,
    accounts: Mutex<HashMap<String, Account>>,
    sign_in_error: Mutex<Option<AppError>>,
    sign_out_error: Mutex<Option<AppError>>,
    require_confirmation: Mutex<bool>,
    sign_ups: Mutex<Vec<(String, SignUpMetadata)>>,
    sign_out_calls: AtomicUsize,
    delivered: Arc<AtomicUsize>,
}

impl FakeIdentityService {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            probe: Mutex::new(Ok(None)),
            probe_gate: Mutex::new(None),
            subscribe_gate: Mutex::new(None),
            accounts: Mutex::new(HashMap::new()),
            sign_in_error: Mutex::new(None),
            sign_out_error: Mutex::new(None),
            require_confirmation: Mutex::new(false),
            sign_ups: Mutex::new(Vec::new()),
            sign_out_calls: AtomicUsize::new(0),
            delivered: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Push an event onto the session stream.
    pub fn emit(&self, event: SessionEvent) {
        // A closed stream means the store already unsubscribed.
        let _ = self.events_tx.send(event);
    }

    pub fn emit_session(&self, kind: SessionEventKind, session: Option<Session>) {
        self.emit(SessionEvent { kind, session });
    }

    /// Result returned by `current_session`.
    pub fn set_probe(&self, result: Result<Option<Session>, AppError>) {
        *self.probe.lock() = result;
    }

    /// Hold `current_session` until the returned gate opens.
    pub fn hold_probe(&self) -> Gate {
        let gate = Gate::new();
        *self.probe_gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold `subscribe` until the returned gate opens.
    pub fn hold_subscribe(&self) -> Gate {
        let gate = Gate::new();
        *self.subscribe_gate.lock() = Some(gate.clone());
        gate
    }

    /// True once the subscriber has dropped its end of the stream.
    pub fn stream_closed(&self) -> bool {
        self.events_tx.is_closed()
    }

    /// Register credentials; returns the session a sign-in will produce.
    pub fn add_account(&self, email: &str, password: &str) -> Session {
        let session = session_for(email);
        self.accounts.lock().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                session: session.clone(),
            },
        );
        session
    }

    pub fn fail_sign_in(&self, err: AppError) {
        *self.sign_in_error.lock() = Some(err);
    }

    pub fn fail_sign_out(&self, err: AppError) {
        *self.sign_out_error.lock() = Some(err);
    }

    pub fn require_confirmation(&self, required: bool) {
        *self.require_confirmation.lock() = required;
    }

    pub fn sign_ups(&self) -> Vec<(String, SignUpMetadata)> {
        self.sign_ups.lock().clone()
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    /// Number of events the subscriber has pulled off the stream.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

impl Default for FakeIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn subscribe(&self) -> Result<SessionEvents, AppError> {
        let gate = self.subscribe_gate.lock().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        let rx = self
            .events_rx
            .lock()
            .take()
            .ok_or_else(|| AppError::internal("fake identity stream already subscribed"))?;
        let delivered = Arc::clone(&self.delivered);
        Ok(UnboundedReceiverStream::new(rx)
            .inspect(move |_| {
                delivered.fetch_add(1, Ordering::SeqCst);
            })
            .boxed())
    }

    async fn current_session(&self) -> Result<Option<Session>, AppError> {
        let gate = self.probe_gate.lock().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        self.probe.lock().clone()
    }

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        if let Some(err) = self.sign_in_error.lock().clone() {
            return Err(err);
        }
        let session = {
            let accounts = self.accounts.lock();
            match accounts.get(email) {
                Some(account) if account.password == password => account.session.clone(),
                _ => {
                    return Err(AppError::credential(
                        ErrorCode::InvalidCredentials,
                        "Invalid login credentials",
                    ))
                }
            }
        };
        self.emit(SessionEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUpOutcome, AppError> {
        if self.accounts.lock().contains_key(email) {
            return Err(AppError::credential(
                ErrorCode::SignUpRejected,
                "User already registered",
            ));
        }
        self.sign_ups
            .lock()
            .push((email.to_string(), metadata.clone()));

        if *self.require_confirmation.lock() {
            return Ok(SignUpOutcome::ConfirmationRequired {
                user_id: UserId::random(),
            });
        }
        let session = self.add_account(email, password);
        self.emit(SessionEvent::signed_in(session.clone()));
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.sign_out_error.lock().clone() {
            return Err(err);
        }
        self.emit(SessionEvent::signed_out());
        Ok(())
    }
}
