use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::AppError;
use crate::identity::{DataStore, IdentityService};
use crate::services::{
    AuthService, IdentityEnrichmentService, Notifier, ReportService, SessionStore, TracingNotifier,
};

/// Explicitly owned client state, built once at startup and passed by
/// reference to whatever needs the session or the services.
pub struct ClientContext {
    pub session: Arc<SessionStore>,
    pub auth: AuthService,
    pub reports: ReportService,
    pub config: ClientConfig,
}

impl ClientContext {
    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}

/// Builder for creating ClientContext instances (used in both tests and hosts)
pub struct ContextBuilder {
    config: ClientConfig,
    identity: Option<Arc<dyn IdentityService>>,
    data_store: Option<Arc<dyn DataStore>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            identity: None,
            data_store: None,
            notifier: None,
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityService>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_data_store(mut self, data_store: Arc<dyn DataStore>) -> Self {
        self.data_store = Some(data_store);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire the services and start the session store.
    pub async fn build(self) -> Result<ClientContext, AppError> {
        let identity = self
            .identity
            .ok_or_else(|| AppError::config("identity service is required"))?;
        let data_store = self
            .data_store
            .ok_or_else(|| AppError::config("data store is required"))?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));

        let enrichment = Arc::new(IdentityEnrichmentService::new(
            Arc::clone(&data_store),
            self.config.enrichment_timeout,
        ));
        let session = Arc::new(SessionStore::new(
            Arc::clone(&identity),
            enrichment,
            notifier,
        ));
        session.start().await?;

        Ok(ClientContext {
            session,
            auth: AuthService::new(identity),
            reports: ReportService::new(data_store),
            config: self.config,
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_context() -> ContextBuilder {
    ContextBuilder::new()
}
