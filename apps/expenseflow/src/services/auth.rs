use std::sync::Arc;

use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::domain::Session;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::identity::{IdentityService, SignUpMetadata, SignUpOutcome};
use crate::logging::pii::Redacted;

const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 100;
const MAX_FULL_NAME_LEN: usize = 100;

/// Credential sign-in and sign-up against the identity service.
///
/// Successful calls do not touch the session store directly; the identity
/// service announces the new session on its change stream.
pub struct AuthService {
    identity: Arc<dyn IdentityService>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        match self.identity.sign_in_with_credentials(&email, password).await {
            Ok(session) => {
                info!(user_id = %session.user_id(), email = %Redacted(&email), "Signed in");
                Ok(session)
            }
            Err(e) => {
                warn!(email = %Redacted(&email), code = %e.code(), "Sign-in rejected");
                Err(as_credential_error(ErrorCode::InvalidCredentials, e))
            }
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<SignUpOutcome, AppError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let full_name = metadata.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::invalid(
                ErrorCode::MissingField,
                "full name is required",
            ));
        }
        if full_name.chars().count() > MAX_FULL_NAME_LEN {
            return Err(AppError::invalid(
                ErrorCode::InvalidFullName,
                format!("full name must be at most {MAX_FULL_NAME_LEN} characters"),
            ));
        }
        if metadata.company_id.is_nil() {
            return Err(AppError::invalid(
                ErrorCode::InvalidIdentifier,
                "company id is required",
            ));
        }
        let metadata = SignUpMetadata {
            full_name,
            ..metadata
        };

        match self.identity.sign_up(&email, password, &metadata).await {
            Ok(outcome) => {
                match &outcome {
                    SignUpOutcome::SignedIn(session) => {
                        info!(user_id = %session.user_id(), email = %Redacted(&email), "Signed up")
                    }
                    SignUpOutcome::ConfirmationRequired { user_id } => info!(
                        user_id = %user_id,
                        email = %Redacted(&email),
                        "Signed up; awaiting email confirmation"
                    ),
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(email = %Redacted(&email), code = %e.code(), "Sign-up rejected");
                Err(as_credential_error(ErrorCode::SignUpRejected, e))
            }
        }
    }
}

/// Trim, NFKC-normalize and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let shaped = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !shaped || email.len() > MAX_EMAIL_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "email address is malformed",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("password must be {MIN_PASSWORD_LEN} to {MAX_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

// Outages stay retryable; everything else is a rejection of the credentials.
fn as_credential_error(code: ErrorCode, err: AppError) -> AppError {
    match err {
        AppError::Credential { .. } | AppError::Unavailable { .. } => err,
        other => AppError::credential(code, other.detail().to_string()),
    }
}
