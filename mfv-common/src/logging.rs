//! Tracing subscriber initialisation
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so that reports printed on stdout stay machine-readable.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

/// Install the global tracing subscriber
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(logging))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))
}
