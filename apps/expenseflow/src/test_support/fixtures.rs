//! Ready-made domain values for tests.

use time::macros::{date, datetime};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::{
    AccessToken, Amount, CompanyId, CurrencyCode, ExpenseId, ExpenseRecord, ExpenseStatus,
    Profile, Session, UserId, UserIdentity,
};

/// Parse a decimal literal into an [`Amount`]; panics on invalid input.
pub fn dec(raw: &str) -> Amount {
    raw.parse()
        .unwrap_or_else(|e| panic!("invalid test amount '{raw}': {e}"))
}

pub fn expense(amount: Amount, category: &str, status: ExpenseStatus) -> ExpenseRecord {
    expense_for(UserId::random(), amount, category, status)
}

pub fn expense_for(
    user_id: UserId,
    amount: Amount,
    category: &str,
    status: ExpenseStatus,
) -> ExpenseRecord {
    ExpenseRecord {
        id: ExpenseId::random(),
        user_id,
        company_id: CompanyId::random(),
        amount,
        currency: CurrencyCode::try_from("USD".to_string())
            .unwrap_or_else(|e| panic!("fixture currency: {e}")),
        category: category.to_string(),
        description: None,
        expense_date: date!(2024-03-14),
        receipt_url: None,
        status,
        created_at: datetime!(2024-03-14 09:30 UTC),
        updated_at: datetime!(2024-03-14 09:30 UTC),
    }
}

/// Fresh one-hour session for a new random user.
pub fn session_for(email: &str) -> Session {
    session_for_user(UserId::random(), email)
}

pub fn session_for_user(user_id: UserId, email: &str) -> Session {
    let issued_at = OffsetDateTime::now_utc();
    Session {
        access_token: AccessToken::new(format!("token-{}", Uuid::new_v4())),
        user: UserIdentity {
            id: user_id,
            email: email.to_string(),
        },
        issued_at,
        expires_at: issued_at + Duration::hours(1),
    }
}

pub fn profile_for(session: &Session) -> Profile {
    let email = session.user.email.clone();
    let full_name = email.split('@').next().unwrap_or_default().to_string();
    Profile {
        id: session.user_id(),
        company_id: CompanyId::random(),
        full_name,
        email,
        created_at: datetime!(2024-01-01 00:00 UTC),
    }
}
