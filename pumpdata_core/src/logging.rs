//! Logging infrastructure for pumpdata.
//!
//! Provides centralized tracing setup for the binary and tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with a warn default
///
/// The CLI prints its reports on stdout, so library chatter stays quiet
/// unless RUST_LOG asks for it.
pub fn init() {
    init_with_level("warn")
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (trace, debug, info, warn, error)
///
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("trace"))
        .try_init();
}
