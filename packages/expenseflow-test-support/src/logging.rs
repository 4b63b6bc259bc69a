//! Tracing subscriber for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Variables consulted for the filter directive, first match wins.
const FILTER_VARS: [&str; 2] = ["EXPENSEFLOW_TEST_LOG", "RUST_LOG"];

/// Used when neither variable is set.
const DEFAULT_DIRECTIVE: &str = "warn";

fn filter_from_env() -> EnvFilter {
    FILTER_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the test subscriber once per process.
///
/// Output goes through the test writer so the harness captures it per test.
/// Safe to call from every `ctor` hook; another global subscriber wins quietly.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let _ = fmt()
            .with_env_filter(filter_from_env())
            .with_test_writer()
            .with_target(true)
            .without_time()
            .try_init();
    });
}
