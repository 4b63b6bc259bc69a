pub mod auth;
pub mod enrichment;
pub mod notifications;
pub mod reports;
pub mod session_store;

pub use auth::AuthService;
pub use enrichment::{Enrichment, IdentityEnrichmentService};
pub use notifications::{Notice, Notifier, Severity, TracingNotifier};
pub use reports::ReportService;
pub use session_store::SessionStore;
