//! Tracing setup for engine hosts.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber with a human-readable fmt layer.
///
/// The filter respects the RUST_LOG environment variable and falls back
/// to `info` when unset.
///
/// # Errors
///
/// Returns error if a subscriber is already installed.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    Ok(())
}
