//! Logging system initialization.
//!
//! Console logging via tracing-subscriber with env-filter control; embedders
//! that already install a subscriber can skip this entirely.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, defaulting to `info` for
/// this crate and `warn` elsewhere.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mpscan=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
