//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries built on the SDK
//! - Configure log level from config, overridable through `RUST_LOG`
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the embedding application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Returns an error if a
/// global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}
