//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "service_station=info";

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a default env-based subscriber if none is set.
///
/// A `.env` file, when present, is loaded first so `RUST_LOG` may come from it.
/// Without `RUST_LOG` the station logs at `info`.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = dotenvy::dotenv();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
