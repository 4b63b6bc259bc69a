//! Test helpers for generating unique test data
//!
//! ULIDs keep generated labels and addresses distinct across test cases that
//! share one process.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use expenseflow_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("category");
/// let id2 = unique_str("category");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("category-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix
///
/// The local part is lowercased so the address survives email normalization
/// unchanged.
///
/// # Examples
/// ```
/// use expenseflow_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("alice");
/// assert!(email.starts_with("alice-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.test",
        prefix,
        Ulid::new().to_string().to_lowercase()
    )
}
