//! Error codes for the ExpenseFlow client core.
//!
//! This module defines all error codes used throughout the crate.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! shown to consumers (and logged).

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Credentials & session
    /// Identity service rejected the email/password pair
    InvalidCredentials,
    /// Identity service rejected the sign-up
    SignUpRejected,
    /// Operation requires a signed-in user
    NotSignedIn,

    // Enrichment
    /// Profile or role lookup failed
    EnrichmentFailed,
    /// No profile row exists for an authenticated user
    ProfileNotFound,
    /// Profile row belongs to a different user than requested
    ProfileMismatch,
    /// Enrichment did not complete within the configured bound
    EnrichmentTimeout,

    // Queries
    /// Expense record query failed
    ExpenseQueryFailed,

    // Validation
    /// Invalid email address
    InvalidEmail,
    /// Password does not meet length requirements
    InvalidPassword,
    /// Full name exceeds the length limit
    InvalidFullName,
    /// Identifier is nil or empty
    InvalidIdentifier,
    /// Amount is negative
    NegativeAmount,
    /// Amount could not be parsed as a decimal
    InvalidAmount,
    /// Currency code is not a 3-letter code
    InvalidCurrency,
    /// Required field is missing
    MissingField,

    // Resource Not Found
    /// General not found error
    NotFound,

    // System Errors
    /// Backing service unreachable
    ServiceUnavailable,
    /// Backing service timed out
    ServiceTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SignUpRejected => "SIGN_UP_REJECTED",
            Self::NotSignedIn => "NOT_SIGNED_IN",

            Self::EnrichmentFailed => "ENRICHMENT_FAILED",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::ProfileMismatch => "PROFILE_MISMATCH",
            Self::EnrichmentTimeout => "ENRICHMENT_TIMEOUT",

            Self::ExpenseQueryFailed => "EXPENSE_QUERY_FAILED",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidFullName => "INVALID_FULL_NAME",
            Self::InvalidIdentifier => "INVALID_IDENTIFIER",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidCurrency => "INVALID_CURRENCY",
            Self::MissingField => "MISSING_FIELD",

            Self::NotFound => "NOT_FOUND",

            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::ServiceTimeout => "SERVICE_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
