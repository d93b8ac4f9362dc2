//! Structured logging setup.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{constants, ProtocolError, Result};

/// Install a global `tracing` subscriber built from `config`.
///
/// Calling this again once a subscriber is installed is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_level.as_str().to_lowercase()).map_err(|e| {
            ProtocolError::ConfigError(format!("{}: {e}", constants::ERR_LOG_FILTER))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init()
    };

    match installed {
        Ok(()) => info!(app = %config.app_name, "Logging initialized"),
        Err(_) => debug!("Global subscriber already installed"),
    }
    Ok(())
}
