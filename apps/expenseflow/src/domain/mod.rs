//! Domain layer: pure identity, role and expense types plus aggregation.

pub mod aggregation;
pub mod expense;
pub mod identity;
pub mod ids;
pub mod roles;

#[cfg(test)]
mod tests_props_aggregation;

// Re-exports for ergonomics
pub use aggregation::{
    aggregate, format_amount, AggregateStats, CategoryBreakdown, CategoryTotal, ExpenseReport,
};
pub use expense::{Amount, CurrencyCode, ExpenseRecord, ExpenseStatus};
pub use identity::{AccessToken, Profile, Session, UserIdentity};
pub use ids::{CompanyId, ExpenseId, UserId};
pub use roles::{has_role, Role, RoleSet};
