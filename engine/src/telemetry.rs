//! Tracing setup

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
}

/// Build the filter from `RUST_LOG`, falling back to `fallback`
pub fn env_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryError::Filter {
            value: fallback.to_string(),
            source,
        }),
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (e.g. by the host
/// application or an earlier call).
pub fn init_tracing(fallback_filter: &str) -> Result<bool, TelemetryError> {
    let filter = env_filter(fallback_filter)?;

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_or_else(|_: TryInitError| false, |()| true);

    if installed {
        tracing::debug!("Tracing initialized");
    }
    Ok(installed)
}
