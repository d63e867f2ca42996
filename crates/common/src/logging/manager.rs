//! Logging initialization.

use std::io;

use thiserror::Error;
use tracing::info;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{
    fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::types::LoggerConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    FileAppender(String),

    #[error("failed to install global subscriber: {0}")]
    Install(String),
}

/// Builds the filter shared by all layers: the configured default level, overridable via
/// `RUST_LOG`.
fn build_filter(config: &LoggerConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.default_level.into())
        .from_env_lossy()
}

/// Initializes the logging subsystem with the provided config.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LoggerConfig) -> Result<(), LoggingError> {
    let filt = build_filter(&config);

    // Configure stdout logging with JSON or compact format
    let stdout = &config.stdout_config;
    let stdout_sub = match (stdout.json_format, stdout.use_stderr) {
        (true, true) => layer()
            .json()
            .with_writer(io::stderr)
            .with_span_events(stdout.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed(),
        (true, false) => layer()
            .json()
            .with_span_events(stdout.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed(),
        (false, true) => layer()
            .compact()
            .with_writer(io::stderr)
            .with_span_events(stdout.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed(),
        (false, false) => layer()
            .compact()
            .with_span_events(stdout.fmt_span.clone())
            .with_filter(filt.clone())
            .boxed(),
    };

    // Build optional file logging layer
    let file_layer = config
        .file_logging_config
        .as_ref()
        .map(|file_config| {
            let file_appender = RollingFileAppender::builder()
                .rotation(file_config.rotation.clone())
                .filename_prefix(&file_config.file_name_prefix)
                .build(&file_config.directory)
                .map_err(|e| LoggingError::FileAppender(e.to_string()))?;

            let layer = if file_config.json_format {
                layer()
                    .json()
                    .with_writer(file_appender)
                    .with_ansi(false) // No color codes in files
                    .with_filter(filt.clone())
                    .boxed()
            } else {
                layer()
                    .compact()
                    .with_writer(file_appender)
                    .with_ansi(false) // No color codes in files
                    .with_filter(filt.clone())
                    .boxed()
            };
            Ok::<_, LoggingError>(layer)
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(stdout_sub)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    info!(service_name = %config.service_name, "logging initialized");
    Ok(())
}
