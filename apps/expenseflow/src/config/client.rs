//! Client configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::error::AppError;

const ENRICHMENT_TIMEOUT_VAR: &str = "EXPENSEFLOW_ENRICHMENT_TIMEOUT_MS";
const LOG_FILTER_VAR: &str = "EXPENSEFLOW_LOG";

const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound for one enrichment fetch; `None` waits indefinitely.
    pub enrichment_timeout: Option<Duration>,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            enrichment_timeout: Some(DEFAULT_ENRICHMENT_TIMEOUT),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from `EXPENSEFLOW_*` variables, falling back to defaults.
    ///
    /// `EXPENSEFLOW_ENRICHMENT_TIMEOUT_MS=0` disables the enrichment bound.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let enrichment_timeout = match env::var(ENRICHMENT_TIMEOUT_VAR) {
            Ok(raw) => parse_timeout_ms(&raw)?,
            Err(env::VarError::NotPresent) => defaults.enrichment_timeout,
            Err(e) => return Err(e.into()),
        };

        let log_filter = env::var(LOG_FILTER_VAR)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            enrichment_timeout,
            log_filter,
        })
    }

    pub fn with_enrichment_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.enrichment_timeout = timeout;
        self
    }
}

fn parse_timeout_ms(raw: &str) -> Result<Option<Duration>, AppError> {
    let ms = raw.trim().parse::<u64>().map_err(|_| {
        AppError::config(format!(
            "{ENRICHMENT_TIMEOUT_VAR} must be a non-negative integer, got '{raw}'"
        ))
    })?;
    Ok((ms > 0).then(|| Duration::from_millis(ms)))
}
