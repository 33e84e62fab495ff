//! Criterion benchmarks for rust_pipeline_logger

use chrono::Local;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_pipeline_logger::prelude::*;
use rust_pipeline_logger::{info, HeaderConfig};
use std::sync::Arc;

fn discard_logger(flags: OutputFlags) -> Logger {
    Logger::new(WriterSink::named(std::io::sink(), "discard"), "bench ", flags)
        .expect("Failed to start logger")
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("start_and_close", |b| {
        b.iter(|| {
            let logger = discard_logger(OutputFlags::DEFAULT);
            logger.close().unwrap();
            black_box(logger)
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_buffered_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffered_logging");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(OutputFlags::DEFAULT);

    group.bench_function("info", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
        });
    });

    group.bench_function("error_with_id", |b| {
        b.iter(|| {
            logger.output_with_id(black_box("req-1"), LogLevel::Error, black_box("Error message"));
        });
    });

    group.bench_function("macro_with_args", |b| {
        b.iter(|| {
            info!(logger, "user {} logged in from {}", black_box(42), black_box("10.0.0.1"));
        });
    });

    logger.set_caller(true);
    group.bench_function("info_with_caller", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
        });
    });

    group.finish();
    logger.close().unwrap();
}

fn bench_hooks(c: &mut Criterion) {
    let mut group = c.benchmark_group("hooks");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(OutputFlags::LEVEL);
    logger.set_hook(|_: &str, content: &[u8]| {
        black_box(content.len());
    });

    group.bench_function("one_hook", |b| {
        b.iter(|| {
            logger.warn(black_box("Hooked message"));
        });
    });

    group.finish();
    logger.close().unwrap();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(discard_logger(OutputFlags::DEFAULT));

    group.bench_function("multi_thread_4", |b| {
        let logger = Arc::clone(&logger);
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            logger.info(black_box("Concurrent message"));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
    logger.close().unwrap();
}

// ============================================================================
// Header Formatting Benchmarks
// ============================================================================

fn bench_header_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_formatting");
    group.throughput(Throughput::Elements(1));

    let now = Local::now();
    let site = rust_pipeline_logger::call_site!();

    for (name, flags) in [
        ("empty", OutputFlags::empty()),
        ("std_level", OutputFlags::STD | OutputFlags::LEVEL),
        ("default", OutputFlags::DEFAULT),
    ] {
        let mut config = HeaderConfig::new("svc ", flags);
        config.caller = true;
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(config.record(
                    black_box(&now),
                    LogLevel::Info,
                    "",
                    Some(&site),
                    black_box("formatted message"),
                ))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = discard_logger(OutputFlags::DEFAULT);
    logger.set_output_level(LogLevel::Warn);

    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            logger.debug(black_box("This should be filtered"));
        });
    });

    group.bench_function("below_threshold_macro", |b| {
        b.iter(|| {
            rust_pipeline_logger::debug!(logger, "filtered {}", black_box(1));
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| {
            logger.error(black_box("This should be logged"));
        });
    });

    group.finish();
    logger.close().unwrap();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_logger_creation,
    bench_buffered_logging,
    bench_hooks,
    bench_concurrent_logging,
    bench_header_formatting,
    bench_level_filtering
);

criterion_main!(benches);
