//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{AppError, AppResult, LoggingConfig};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over [`LoggingConfig::filter`].
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
