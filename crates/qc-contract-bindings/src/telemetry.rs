//! Console tracing setup for applications that embed the binding engine.

use crate::config::BindingConfig;
use crate::errors::TelemetryError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Builds the filter: `RUST_LOG` if set, else the configured log level.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] if neither parses.
pub fn env_filter(config: &BindingConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))
}

/// Installs a global fmt subscriber.
///
/// # Errors
///
/// [`TelemetryError::InvalidFilter`] for a bad filter,
/// [`TelemetryError::SubscriberInit`] if a global subscriber already exists.
pub fn init_tracing(config: &BindingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}
