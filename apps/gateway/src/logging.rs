//! Structured logging setup using tracing.
//!
//! JSON output by default, suitable for log aggregation; a human-readable
//! format is available for local development via `logging.format: text`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from the configured
/// level.
///
/// # Panics
///
/// Panics if the subscriber has already been initialized.
pub fn init_logging(config: &LoggingConfig) {
    let filter_layer =
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level)) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("FATAL: Failed to create log filter: {e}");
                std::process::exit(1);
            }
        };

    let fmt_layer: Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync> = if config.format
        == "json"
    {
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .boxed()
    } else {
        fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    tracing::info!(level = %config.level, format = %config.format, "Logging initialized");
}

/// Initialize logging for tests (with simpler output).
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
