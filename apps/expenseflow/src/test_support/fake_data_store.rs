//! In-memory data store with per-user gates and injected failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::fixtures::profile_for;
use super::gate::Gate;
use crate::domain::{ExpenseRecord, Profile, Role, Session, UserId};
use crate::error::AppError;
use crate::identity::{DataStore, ExpenseFilter};

#[derive(Default)]
pub struct FakeDataStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
    roles: Mutex<HashMap<UserId, Vec<Role>>>,
    expenses: Mutex<Vec<ExpenseRecord>>,
    gates: Mutex<HashMap<UserId, Gate>>,
    profile_errors: Mutex<HashMap<UserId, AppError>>,
    roles_errors: Mutex<HashMap<UserId, AppError>>,
    query_error: Mutex<Option<AppError>>,
    profile_calls: AtomicUsize,
}

impl FakeDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile for the session's user plus the given role rows.
    pub fn add_user(&self, session: &Session, roles: &[Role]) -> Profile {
        let profile = profile_for(session);
        self.profiles
            .lock()
            .insert(session.user_id(), profile.clone());
        self.roles.lock().insert(session.user_id(), roles.to_vec());
        profile
    }

    pub fn put_profile(&self, user_id: UserId, profile: Profile) {
        self.profiles.lock().insert(user_id, profile);
    }

    pub fn add_expenses(&self, records: impl IntoIterator<Item = ExpenseRecord>) {
        self.expenses.lock().extend(records);
    }

    /// Hold enrichment lookups for `user_id` until the gate opens.
    pub fn hold(&self, user_id: UserId) -> Gate {
        let gate = Gate::new();
        self.gates.lock().insert(user_id, gate.clone());
        gate
    }

    pub fn fail_profile(&self, user_id: UserId, err: AppError) {
        self.profile_errors.lock().insert(user_id, err);
    }

    pub fn fail_roles(&self, user_id: UserId, err: AppError) {
        self.roles_errors.lock().insert(user_id, err);
    }

    pub fn fail_queries(&self, err: AppError) {
        *self.query_error.lock() = Some(err);
    }

    /// Remove every injected failure for `user_id`.
    pub fn heal(&self, user_id: UserId) {
        self.profile_errors.lock().remove(&user_id);
        self.roles_errors.lock().remove(&user_id);
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self, user_id: UserId) {
        let gate = self.gates.lock().get(&user_id).cloned();
        if let Some(gate) = gate {
            gate.wait().await;
        }
    }
}

#[async_trait]
impl DataStore for FakeDataStore {
    async fn fetch_profile(&self, user_id: UserId) -> Result<Option<Profile>, AppError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate(user_id).await;
        if let Some(err) = self.profile_errors.lock().get(&user_id).cloned() {
            return Err(err);
        }
        Ok(self.profiles.lock().get(&user_id).cloned())
    }

    async fn fetch_roles(&self, user_id: UserId) -> Result<Vec<Role>, AppError> {
        self.pass_gate(user_id).await;
        if let Some(err) = self.roles_errors.lock().get(&user_id).cloned() {
            return Err(err);
        }
        Ok(self.roles.lock().get(&user_id).cloned().unwrap_or_default())
    }

    async fn query_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, AppError> {
        if let Some(err) = self.query_error.lock().clone() {
            return Err(err);
        }
        Ok(self
            .expenses
            .lock()
            .iter()
            .filter(|record| record.user_id == filter.user_id)
            .cloned()
            .collect())
    }
}
