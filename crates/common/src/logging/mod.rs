//! Logging subsystem built on `tracing-subscriber`.

mod manager;
mod types;


pub use manager::{init, LoggingError};
// Re-export tracing-appender types for convenience
pub use tracing_appender::rolling::Rotation;
pub use types::{FileLoggingConfig, LogRotation, LoggerConfig, StdoutConfig};
