//! `tracing` bootstrap.
//!
//! The registry crates only emit events. Hosts that have no subscriber of
//! their own can call [`init_logging`] once at startup.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set. Returns `false`
/// if another subscriber was already installed, which is not an error.
///
/// ```
/// use sijill_support::logging::init_logging;
///
/// init_logging("sijill=debug");
/// // a second call is harmless
/// assert!(!init_logging("sijill=trace"));
/// ```
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        debug!(filter = default_filter, "Logging initialized");
    }
    installed
}
