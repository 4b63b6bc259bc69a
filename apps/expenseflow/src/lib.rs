#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod identity;
pub mod infra;
pub mod logging;
pub mod services;
pub mod state;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;


// Re-exports for public API
pub use config::ClientConfig;
pub use domain::{aggregate, format_amount, has_role, ExpenseReport, Role, RoleSet};
pub use error::AppError;
pub use errors::ErrorCode;
pub use identity::{DataStore, IdentityService, SessionEvent, SessionEventKind};
pub use infra::context::{build_context, ClientContext, ContextBuilder};
pub use services::{AuthService, IdentityEnrichmentService, Notifier, ReportService, SessionStore};
pub use state::{SessionSnapshot, SessionState};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
