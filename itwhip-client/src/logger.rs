//! Logging setup
//!
//! `RUST_LOG` wins over the level passed in.

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with(None, false);
}

/// Initialize the logger with an optional level and JSON output
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger_with(log_level: Option<&str>, json: bool) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
