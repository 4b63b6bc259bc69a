//! Interfaces of the external identity and data services.
//!
//! The backing service is a black box; these traits describe exactly the
//! surface the client core depends on.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::domain::{CompanyId, ExpenseRecord, Profile, Role, Session, UserId};
use crate::error::AppError;

/// Why the identity service emitted a session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// One notification from the session-change stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    /// `None` on sign-out or expiry.
    pub session: Option<Session>,
}

impl SessionEvent {
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: SessionEventKind::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: SessionEventKind::SignedOut,
            session: None,
        }
    }
}

/// Session-change stream, delivered in emission order. Dropping it unsubscribes.
pub type SessionEvents = BoxStream<'static, SessionEvent>;

/// Metadata attached to a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub company_id: CompanyId,
    pub role: Role,
}

/// Result of a sign-up: some identity services require email confirmation
/// before issuing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired { user_id: UserId },
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Subscribe to session changes.
    async fn subscribe(&self) -> Result<SessionEvents, AppError>;

    /// One-shot probe for an existing session.
    async fn current_session(&self) -> Result<Option<Session>, AppError>;

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<SignUpOutcome, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;
}

/// Filter for the expense query. Only the owning user is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub user_id: UserId,
}

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Profile row keyed by user id; `Ok(None)` when no row exists.
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, AppError>;

    /// Role rows for the user; may contain duplicates.
    async fn fetch_roles(&self, user_id: UserId) -> Result<Vec<Role>, AppError>;

    async fn query_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, AppError>;
}
