//! In-memory collaborators and fixtures for unit and integration tests.

pub mod fake_data_store;
pub mod fake_identity;
pub mod fixtures;
pub mod gate;
pub mod recording_notifier;

pub use fake_data_store::FakeDataStore;
pub use fake_identity::FakeIdentityService;
pub use gate::Gate;
pub use recording_notifier::RecordingNotifier;
