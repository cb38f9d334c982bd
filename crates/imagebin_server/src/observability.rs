//! Tracing subscriber setup.

use crate::ServerConfig;
use imagebin_error::{ConfigError, ImagebinResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the configured
/// log level. `verbose` forces `debug`. Output is JSON when `json_logs` is set.
///
/// # Errors
///
/// Returns a configuration error if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_tracing(config: &ServerConfig, verbose: bool) -> ImagebinResult<()> {
    let env_filter = if verbose {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(config.log_level()))
    }
    .map_err(|e| ConfigError::new(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = if *config.json_logs() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to initialise tracing: {}", e)))?;

    Ok(())
}
