//! # Observability & Tracing
//!
//! Structured logging for the whole bar, built on `tracing`.
//!
//! Standard output belongs to the bar protocol, so every log line goes to **stderr**.
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info bar-status 2>bar.log
//!
//! # Every update, stop and done acknowledgment
//! RUST_LOG=debug bar-status 2>bar.log
//!
//! # Only the orchestrator
//! RUST_LOG=bar_status::lifecycle=debug bar-status 2>bar.log
//! ```
//!
//! Widget tasks log with an `index` field (their registration index) and a `widget`
//! field (their name), so one widget's story can be filtered out of a busy log.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `"warn"`) is used.
pub fn setup_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
