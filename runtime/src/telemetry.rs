//! Tracing subscriber setup.

use crate::config::CinemaConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// the configured log level.
///
/// Returns `false` if a subscriber was already installed; the existing one is
/// kept.
pub fn init_tracing(config: &CinemaConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.logging.level, "Tracing initialised");
    }
    installed
}
