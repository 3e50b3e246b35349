//! Logging macros for printf-style formatting.
//!
//! Each macro takes the logger followed by `format!`-style arguments and
//! forwards them as `format_args!`, so the message is only rendered once,
//! inside the formatter.
//!
//! # Examples
//!
//! ```
//! use esl_logger::prelude::*;
//! use esl_logger::{info, warn};
//!
//! let logger = AsyncLogger::new("gateway", "development", None);
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! let line = info!(logger, "Listening on port {}", port);
//! assert!(line.ends_with("gateway INFO: Listening on port 8080"));
//!
//! warn!(logger, "{} retries left", 2);
//! logger.close();
//! ```

/// Log at an explicit severity and return the plain line.
///
/// ```
/// # use esl_logger::prelude::*;
/// # let logger = AsyncLogger::new("svc", "test", None);
/// use esl_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// # logger.close();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use esl_logger::prelude::*;
/// # let logger = AsyncLogger::new("svc", "test", None);
/// use esl_logger::error;
/// let line = error!(logger, "connection to {} refused", "db-1");
/// let err = std::io::Error::new(std::io::ErrorKind::Other, line);
/// # logger.close();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a fatal message and exit the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format_args!($($arg)+))
    };
}
