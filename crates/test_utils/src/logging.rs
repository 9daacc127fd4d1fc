//! Test Tracing Setup
//!
//! Installs a global `tracing` subscriber once per test binary so that log
//! output from the domain crates shows up in failing tests. The filter is
//! read from `RUST_LOG` and defaults to `debug` for the workspace crates.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "warn,domain_commission=debug,domain_settlement=debug";

/// Initializes test logging; safe to call from every test
pub fn init_test_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // another harness may already own the global subscriber
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
