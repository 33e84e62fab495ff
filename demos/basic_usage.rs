//! Basic logger usage example
//!
//! Demonstrates buffered logging to the console, thresholds, hooks and the
//! per-level counters.
//!
//! Run with: cargo run --example basic_usage

use rust_pipeline_logger::prelude::*;
use rust_pipeline_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Pipeline Logger - Basic Usage Example ===\n");

    // Records are formatted here and written by a background thread
    let logger = Logger::builder()
        .prefix("demo ")
        .flags(OutputFlags::STD | OutputFlags::LEVEL | OutputFlags::SHORT_FILE)
        .caller(true)
        .build(ConsoleSink::new())?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Raising the threshold to WARN:");
    logger.set_output_level_name("warn");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    warn!(logger, "Disk usage at {}%", 91);

    println!("\n3. Request ids and hooks:");
    logger.set_output_level(LogLevel::Debug);
    logger.set_hook(|level: &str, content: &[u8]| {
        if level == "error" {
            eprint!("hook saw: {}", String::from_utf8_lossy(content));
        }
    });
    logger.output("req-7f3a", LogLevel::Info, "request accepted")?;
    logger.output("req-7f3a", LogLevel::Error, "upstream timed out")?;
    info!(logger, "{} records queued", logger.pending());

    logger.close()?;

    println!("\n4. Counters:");
    for (level, count) in logger.stat().iter() {
        println!("   {:<6} {}", level.to_str(), count);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
