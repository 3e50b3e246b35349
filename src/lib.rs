//! # ESL Logger
//!
//! An asynchronous, leveled logger. Each call formats a colorized line on
//! the caller's thread and queues it; one background worker writes queued
//! lines, in order, to standard output or to a rotating log file.
//!
//! ## Features
//!
//! - **Non-blocking**: callers only wait when 100 lines are already queued
//! - **Ordered**: a single writer delivers lines in enqueue order, exactly once
//! - **Environment presets**: console output by default, rotating files in production
//! - **Colorized**: every severity has its own ANSI color
//!
//! ```
//! use esl_logger::{info, AsyncLogger};
//!
//! let logger = AsyncLogger::new("checkout", "development", None);
//! info!(logger, "order {} placed", 42);
//! logger.close();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AsyncLogger, Config, ConfigBuilder, LoggerError, LoggerMetrics, Result, Severity, Sink,
        SinkTarget, Template,
    };
    pub use crate::sinks::{ConsoleSink, RotatingFileSink, RotationPolicy};
}

pub use crate::core::{
    AsyncLogger, Config, ConfigBuilder, FormattedLine, LoggerError, LoggerMetrics, Result,
    Severity, Sink, SinkTarget, Template, COLOR_RESET, FATAL_EXIT_CODE, PRODUCTION,
    QUEUE_CAPACITY,
};
pub use sinks::{ConsoleSink, RotatingFileSink, RotationPolicy};
