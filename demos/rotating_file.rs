//! Rotation mode example
//!
//! Demonstrates handing records to a size-limited rotating file instead of
//! the buffered queue.
//!
//! Run with: cargo run --example rotating_file

use rust_pipeline_logger::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Rust Pipeline Logger - Rotating File Example ===\n");

    let dir = std::env::temp_dir().join("rust_pipeline_logger_demo");
    let path = dir.join("app.log");

    // Tiny limit so a handful of records triggers rotation
    let policy = RotationPolicy::new()
        .with_max_size(256)
        .with_max_backups(3)
        .with_compression(false);
    let delegate = RotatingFileLogger::with_policy(&path, policy)?
        .with_prefix("app ")
        .with_flags(OutputFlags::DATE | OutputFlags::TIME | OutputFlags::LEVEL);

    let logger = Logger::with_rotation(delegate);
    logger.set_output_level(LogLevel::Info);
    logger.set_daily_rotate(true);

    for i in 0..40 {
        logger.info(format!("processing batch {}", i));
        if i % 10 == 9 {
            logger.warn(format!("batch {} took longer than expected", i));
        }
    }
    logger.debug("not written, below threshold");
    logger.close()?;

    println!("Log files in {}:", dir.display());
    let mut entries: Vec<_> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    for entry in entries {
        let size = fs::metadata(&entry).map(|m| m.len()).unwrap_or(0);
        println!("   {} ({} bytes)", entry.display(), size);
    }

    let stats = logger.stat();
    println!(
        "\ninfo={} warn={} total={}",
        stats.get(LogLevel::Info),
        stats.get(LogLevel::Warn),
        stats.total()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
