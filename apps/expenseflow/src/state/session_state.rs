//! Session snapshot shared between the session store (single writer) and
//! its consumers (many readers).

use crate::domain::{Profile, RoleSet, Session, UserId, UserIdentity};
use crate::error::AppError;

static NO_ROLES: RoleSet = RoleSet::new();

/// Shape of the session snapshot.
///
/// Profile and roles only ever live next to the session they were fetched
/// for, so the `(user, profile, roles)` triple cannot mix users.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup; neither the stream nor the probe has reported yet.
    Uninitialized,
    Unauthenticated,
    /// Session known, enrichment in flight.
    Authenticating { session: Session },
    Authenticated {
        session: Session,
        profile: Profile,
        roles: RoleSet,
    },
    /// Signed in, but enrichment failed; profile absent, roles empty.
    Unenriched { session: Session, failure: AppError },
}

impl SessionState {
    pub fn phase(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating { .. } => "authenticating",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Unenriched { .. } => "unenriched",
        }
    }
}

/// Identity of the sign-in an enrichment fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subject {
    pub(crate) user_id: UserId,
    pub(crate) epoch: u64,
}

/// Point-in-time view of the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    state: SessionState,
    /// Bumped on every transition into `Authenticating`.
    pub(crate) epoch: u64,
    /// Set once a stream event or a local sign-out has been applied; the
    /// current-session probe is ignored from then on.
    pub(crate) probe_superseded: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Uninitialized,
            epoch: 0,
            probe_superseded: false,
        }
    }
}

impl SessionSnapshot {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticating { session }
            | SessionState::Authenticated { session, .. }
            | SessionState::Unenriched { session, .. } => Some(session),
            SessionState::Uninitialized | SessionState::Unauthenticated => None,
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.session().map(|session| &session.user)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match &self.state {
            SessionState::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Roles of the current user; empty unless enrichment succeeded.
    pub fn roles(&self) -> &RoleSet {
        match &self.state {
            SessionState::Authenticated { roles, .. } => roles,
            _ => &NO_ROLES,
        }
    }

    /// False while the store does not yet know who the user is.
    pub fn is_ready(&self) -> bool {
        !matches!(
            self.state,
            SessionState::Uninitialized | SessionState::Authenticating { .. }
        )
    }

    pub fn enrichment_error(&self) -> Option<&AppError> {
        match &self.state {
            SessionState::Unenriched { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub(crate) fn subject(&self) -> Option<Subject> {
        self.user().map(|user| Subject {
            user_id: user.id,
            epoch: self.epoch,
        })
    }

    /// Start a new sign-in epoch for `session` and return its subject.
    pub(crate) fn begin_authenticating(&mut self, session: Session) -> Subject {
        self.epoch += 1;
        let subject = Subject {
            user_id: session.user_id(),
            epoch: self.epoch,
        };
        self.state = SessionState::Authenticating { session };
        subject
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }
}
