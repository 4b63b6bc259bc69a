use thiserror::Error;

use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Credentials rejected: {detail}")]
    Credential { code: ErrorCode, detail: String },
    #[error("Enrichment failed: {detail}")]
    Enrichment { code: ErrorCode, detail: String },
    #[error("Query failed: {detail}")]
    Query { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Service unavailable: {detail}")]
    Unavailable { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Credential { code, .. } => *code,
            AppError::Enrichment { code, .. } => *code,
            AppError::Query { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Unavailable { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// Helper method to extract error detail from any error variant
    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::Credential { detail, .. }
            | AppError::Enrichment { detail, .. }
            | AppError::Query { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Unavailable { detail, .. }
            | AppError::Config { detail }
            | AppError::Internal { detail } => detail,
        }
    }

    /// Whether a manual retry from the consumer can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Enrichment { .. } | AppError::Query { .. } | AppError::Unavailable { .. }
        )
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn credential(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Credential {
            code,
            detail: detail.into(),
        }
    }

    pub fn enrichment(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Enrichment {
            code,
            detail: detail.into(),
        }
    }

    pub fn query(detail: impl Into<String>) -> Self {
        Self::Query {
            code: ErrorCode::ExpenseQueryFailed,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::Unavailable {
            code: ErrorCode::ServiceUnavailable,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::NegativeAmount => ErrorCode::NegativeAmount,
                    ValidationKind::InvalidAmount => ErrorCode::InvalidAmount,
                    ValidationKind::InvalidCurrency => ErrorCode::InvalidCurrency,
                    ValidationKind::NilIdentifier => ErrorCode::InvalidIdentifier,
                    ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
                    ValidationKind::InvalidPassword => ErrorCode::InvalidPassword,
                    ValidationKind::MissingField => ErrorCode::MissingField,
                };
                AppError::invalid(code, detail)
            }
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}
