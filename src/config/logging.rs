//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directive
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),
}

/// Build the filter for `directive`, e.g. `info` or `invoices=debug,tower_http=info`
pub fn env_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", directive, e)))
}

/// Install a console subscriber filtered by `LOG_LEVEL` (default `info`)
pub fn init_logging() -> Result<(), LoggingError> {
    let directive = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());
    let filter = env_filter(&directive)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationError(e.to_string()))
}
