// Unit tests for error mapping - pure domain logic without transport dependencies
use crate::errors::domain::{DomainError, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds_to_codes() {
    let de = DomainError::validation(ValidationKind::NegativeAmount, "amount -1");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::NegativeAmount);
    assert!(matches!(app, AppError::Validation { .. }));

    let de = DomainError::validation(ValidationKind::MissingField, "full_name is required");
    let app: AppError = de.into();
    assert_eq!(app.code().as_str(), "MISSING_FIELD");
    assert_eq!(app.detail(), "full_name is required");
}

#[test]
fn lookup_errors_keep_their_kind() {
    let app = AppError::not_found(ErrorCode::NotFound, "no such row");
    assert_eq!(app.code().as_str(), "NOT_FOUND");
    assert!(!app.is_retryable());

    let internal = AppError::internal("weird");
    assert_eq!(internal.code(), ErrorCode::Internal);
    assert!(!internal.is_retryable());
}

#[test]
fn retryable_kinds() {
    assert!(AppError::query("boom").is_retryable());
    assert!(AppError::enrichment(ErrorCode::EnrichmentFailed, "boom").is_retryable());
    assert!(!AppError::credential(ErrorCode::InvalidCredentials, "nope").is_retryable());
    assert!(!AppError::config("bad").is_retryable());
}

#[test]
fn display_includes_detail() {
    let err = AppError::query("network down");
    assert_eq!(err.to_string(), "Query failed: network down");
    assert_eq!(err.code(), ErrorCode::ExpenseQueryFailed);
}
