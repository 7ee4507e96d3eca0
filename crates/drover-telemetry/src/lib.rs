//! Logging setup for Drover
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer in either human-readable or JSON form

use drover_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber from configuration
///
/// Falls back to `info` when the filter directive does not parse.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(&config.filter);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}
