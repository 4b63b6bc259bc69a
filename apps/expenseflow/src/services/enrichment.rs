//! Profile and role lookup for an authenticated user.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Profile, RoleSet, UserId};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::identity::DataStore;

/// Profile plus de-duplicated roles for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub profile: Profile,
    pub roles: RoleSet,
}

pub struct IdentityEnrichmentService {
    store: Arc<dyn DataStore>,
    timeout: Option<Duration>,
}

impl IdentityEnrichmentService {
    pub fn new(store: Arc<dyn DataStore>, timeout: Option<Duration>) -> Self {
        Self { store, timeout }
    }

    /// Fetch profile and roles for `user_id` concurrently.
    ///
    /// Fails with an `Enrichment` error if either lookup fails, if no profile
    /// row exists, or if the configured timeout elapses. Never retries.
    pub async fn fetch_enrichment(&self, user_id: UserId) -> Result<Enrichment, AppError> {
        if user_id.is_nil() {
            return Err(AppError::enrichment(
                ErrorCode::InvalidIdentifier,
                "cannot enrich a nil user id",
            ));
        }

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.lookup(user_id))
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::enrichment(
                        ErrorCode::EnrichmentTimeout,
                        format!("enrichment exceeded {}ms", limit.as_millis()),
                    ))
                }),
            None => self.lookup(user_id).await,
        };

        match &result {
            Ok(enrichment) => debug!(
                user_id = %user_id,
                roles = enrichment.roles.len(),
                "Enrichment fetched"
            ),
            Err(e) => warn!(user_id = %user_id, code = %e.code(), error = %e, "Enrichment failed"),
        }
        result
    }

    async fn lookup(&self, user_id: UserId) -> Result<Enrichment, AppError> {
        let (profile, roles) = tokio::try_join!(
            async {
                self.store
                    .fetch_profile(user_id)
                    .await
                    .map_err(|e| as_enrichment_error("profile", e))
            },
            async {
                self.store
                    .fetch_roles(user_id)
                    .await
                    .map_err(|e| as_enrichment_error("roles", e))
            },
        )?;

        let profile = profile.ok_or_else(|| {
            AppError::enrichment(
                ErrorCode::ProfileNotFound,
                format!("no profile row for user {user_id}"),
            )
        })?;
        if profile.id != user_id {
            return Err(AppError::enrichment(
                ErrorCode::ProfileMismatch,
                format!("profile {} returned for user {user_id}", profile.id),
            ));
        }

        Ok(Enrichment {
            profile,
            roles: roles.into_iter().collect(),
        })
    }
}

fn as_enrichment_error(lookup: &str, err: AppError) -> AppError {
    match err {
        AppError::Enrichment { .. } => err,
        AppError::NotFound { detail, .. } => AppError::enrichment(
            ErrorCode::ProfileNotFound,
            format!("{lookup} lookup found nothing: {detail}"),
        ),
        AppError::Unavailable {
            code: ErrorCode::ServiceTimeout,
            detail,
        } => AppError::enrichment(
            ErrorCode::EnrichmentTimeout,
            format!("{lookup} lookup timed out: {detail}"),
        ),
        other => AppError::enrichment(
            ErrorCode::EnrichmentFailed,
            format!("{lookup} lookup failed: {}", other.detail()),
        ),
    }
}
