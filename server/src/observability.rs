//! Logging initialisation.
//!
//! JSON lines on stdout, filtered by `RUST_LOG` when set and by the
//! configured default filter otherwise.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Call once from `main`, before anything logs. A second call is a no-op.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}
