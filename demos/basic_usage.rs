//! Basic logger usage example
//!
//! Logs at every severity to the console and shows the returned plain line.
//!
//! Run with: cargo run --example basic_usage

use esl_logger::prelude::*;
use esl_logger::{debug, error, info, warn};

fn main() {
    println!("=== ESL Logger - Basic Usage Example ===\n");

    // Any environment other than "production" logs to stdout
    let logger = AsyncLogger::new("basic", "development", None);

    println!("1. Logging at different severities:");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warn!(logger, "This is a warning message");
    error!(logger, "This is an error message");

    println!("\n2. Reusing the returned line:");
    let line = error!(logger, "payment {} declined", "pm_1042");
    let err = std::io::Error::new(std::io::ErrorKind::Other, line);

    // Wait for the worker to write everything queued so far
    logger.close();
    println!("   returned error: {}", err);

    println!("\n=== Example completed successfully! ===");
}
