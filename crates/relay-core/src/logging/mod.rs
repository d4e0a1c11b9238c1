//! Structured logging with `tracing`.
//!
//! Components log through the `tracing` macros with structured fields and
//! never print directly. The binary installs one stderr subscriber at startup
//! via [`init_subscriber`]. Tests record events in memory with
//! [`capture_logs`].

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the requested level parses.
pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter: `RUST_LOG` first, then `level`, then [`DEFAULT_LEVEL`].
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global stderr subscriber. Later calls are no-ops.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // already installed
    let _ = subscriber.try_init();
}
