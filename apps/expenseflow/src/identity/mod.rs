//! Ports to the external identity/data service.

pub mod ports;

pub use ports::{
    DataStore, ExpenseFilter, IdentityService, SessionEvent, SessionEventKind, SessionEvents,
    SignUpMetadata, SignUpOutcome,
};
