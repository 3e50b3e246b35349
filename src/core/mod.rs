//! Core logger types and traits

pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod metrics;
pub mod severity;
pub mod sink;

pub use config::{Config, ConfigBuilder, SinkTarget, PRODUCTION};
pub use error::{LoggerError, Result};
pub use formatter::{FormattedLine, Template};
pub use logger::{AsyncLogger, FATAL_EXIT_CODE, QUEUE_CAPACITY};
pub use metrics::LoggerMetrics;
pub use severity::{Severity, COLOR_RESET};
pub use sink::Sink;
