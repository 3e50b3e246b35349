//! Production preset example
//!
//! Logs to a rotating file (10 MB per file, 3 backups, 30 days).
//!
//! Run with: cargo run --example production_logging

use esl_logger::prelude::*;
use esl_logger::{info, warn};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== ESL Logger - Production Logging Example ===\n");

    let log_path = Path::new("logs/production_example.log");
    let logger = AsyncLogger::new("orders", "production", Some(log_path));

    println!("Sink: {}", logger.config().sink());
    if let Some(rotation) = logger.config().rotation() {
        println!(
            "Rotation: {} MB, {} backups, {} days",
            rotation.max_size_mb, rotation.max_backups, rotation.max_age_days
        );
    }

    for order in 0..1000 {
        info!(logger, "order {} accepted", order);
        if order % 250 == 0 {
            warn!(logger, "order {} needs manual review", order);
        }
    }

    logger.close();

    let metrics = logger.metrics();
    println!(
        "\nEnqueued {} lines, wrote {}, failed {}",
        metrics.enqueued(),
        metrics.written(),
        metrics.write_failures()
    );
    println!("Configuration used:\n{}", logger.config().to_json()?);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
