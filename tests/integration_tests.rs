//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Header layout written to a real file
//! - Threshold filtering and per-level statistics
//! - Drain-before-close
//! - Hooks on a fixed worker set, and failing sinks
//! - Rotation mode end to end
//! - Configuration loading

use chrono::{NaiveDate, NaiveTime};
use rust_pipeline_logger::prelude::*;
use rust_pipeline_logger::sinks::FileSink;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

#[test]
fn test_header_layout_in_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("svc.log");

    let sink = FileSink::new(&log_file).expect("Failed to create sink");
    let logger = Logger::builder()
        .prefix("svc ")
        .flags(OutputFlags::DATE | OutputFlags::TIME | OutputFlags::LEVEL)
        .level(LogLevel::Info)
        .build(sink)
        .expect("Failed to build logger");

    logger.info("ready");
    logger.close().expect("Failed to close");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    // svc [YYYY-MM-DD HH:MM:SS] [INFO]ready\n
    assert_eq!(content.len(), "svc [2024-01-01 00:00:00] [INFO]ready\n".len());
    assert!(content.starts_with("svc ["));
    assert!(NaiveDate::parse_from_str(&content[5..15], "%Y-%m-%d").is_ok());
    assert_eq!(&content[15..16], " ");
    assert!(NaiveTime::parse_from_str(&content[16..24], "%H:%M:%S").is_ok());
    assert_eq!(&content[24..], "] [INFO]ready\n");
}

#[test]
fn test_microsecond_header() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone(), "", OutputFlags::TIME | OutputFlags::MICROSECONDS).unwrap();
    logger.warn("tick");
    logger.close().unwrap();

    let content = sink.contents();
    // HH:MM:SS.ffffff] tick\n
    assert!(NaiveTime::parse_from_str(&content[..15], "%H:%M:%S%.6f").is_ok(), "{:?}", content);
    assert_eq!(&content[15..], "] tick\n");
}

#[test]
fn test_threshold_error_filters_lower_levels() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone(), "", OutputFlags::LEVEL).unwrap();
    logger.set_output_level(LogLevel::Error);

    logger.debug("debug message");
    logger.info("info message");
    logger.warn("warn message");
    logger.error("error message");
    logger
        .output("", LogLevel::Panic, "panic message")
        .expect("output failed");
    logger
        .output("", LogLevel::Fatal, "fatal message")
        .expect("output failed");
    logger.close().unwrap();

    assert_eq!(
        sink.lines(),
        vec!["[ERROR]error message", "[PANIC]panic message", "[FATAL]fatal message"]
    );
    let stats = logger.stat();
    assert_eq!(stats.get(LogLevel::Debug), 0);
    assert_eq!(stats.get(LogLevel::Info), 0);
    assert_eq!(stats.get(LogLevel::Warn), 0);
    assert_eq!(stats.total(), 3);
}

#[test]
fn test_stat_counts_only_emitted_level() {
    let logger = Logger::new(MemorySink::new(), "", OutputFlags::empty()).unwrap();
    for i in 0..17 {
        logger.warn(format!("warning {}", i));
    }

    let snapshot = logger.stat();
    assert_eq!(snapshot.as_array(), [0, 0, 17, 0, 0, 0]);

    logger.warn("one more");
    // snapshot is a copy
    assert_eq!(snapshot.get(LogLevel::Warn), 17);
    assert_eq!(logger.stat().get(LogLevel::Warn), 18);
    logger.close().unwrap();
}

#[test]
fn test_drain_before_close() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone(), "", OutputFlags::empty()).unwrap();

    for i in 0..500 {
        logger.info(format!("record {}", i));
    }
    logger.close().expect("Failed to close");

    let lines = sink.lines();
    assert_eq!(lines.len(), 500);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &format!("record {}", i));
    }
    assert!(sink.is_closed());
    assert_eq!(logger.metrics().records_written(), 500);
}

#[test]
fn test_every_record_ends_in_one_newline() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone(), "", OutputFlags::LEVEL).unwrap();
    logger.info("no newline");
    logger.info("has newline\n");
    logger.info("");
    logger.close().unwrap();

    assert_eq!(sink.contents(), "[INFO]no newline\n[INFO]has newline\n[INFO]\n");
}

#[test]
fn test_hooks_see_accepted_records() {
    let (tx, rx) = crossbeam_channel::unbounded::<(String, String)>();
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .flags(OutputFlags::LEVEL)
        .level(LogLevel::Info)
        .hook(move |level: &str, content: &[u8]| {
            let _ = tx.send((level.to_string(), String::from_utf8_lossy(content).into_owned()));
        })
        .build(sink.clone())
        .unwrap();

    logger.debug("filtered");
    logger.error("disk failure");
    logger.close().unwrap();

    let (level, content) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("hook was not fired");
    assert_eq!(level, "error");
    assert_eq!(content, "[ERROR]disk failure\n");
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn test_set_hooks_replaces_previous_set() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let logger = Logger::new(MemorySink::new(), "", OutputFlags::empty()).unwrap();

    let counter = Arc::clone(&first);
    logger.set_hook(move |_: &str, _: &[u8]| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    logger.info("one");
    assert!(wait_until(|| first.load(Ordering::SeqCst) == 1));

    let counter = Arc::clone(&second);
    logger.set_hooks(Hooks::new().with(move |_: &str, _: &[u8]| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    logger.info("two");
    assert!(wait_until(|| second.load(Ordering::SeqCst) == 1));
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(first.load(Ordering::SeqCst), 1);
    logger.close().unwrap();
}

#[test]
fn test_slow_hook_does_not_delay_logging() {
    const RECORDS: usize = 5000;
    let (release_tx, release_rx) = crossbeam_channel::unbounded::<()>();
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let fired = Arc::new(AtomicUsize::new(0));
    let sink = MemorySink::new();
    let logger = {
        let (active, peak, fired) = (Arc::clone(&active), Arc::clone(&peak), Arc::clone(&fired));
        Logger::builder()
            .flags(OutputFlags::empty())
            .hook(move |_: &str, _: &[u8]| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                let _ = release_rx.recv_timeout(Duration::from_secs(10));
                active.fetch_sub(1, Ordering::SeqCst);
                fired.fetch_add(1, Ordering::SeqCst);
            })
            .build(sink.clone())
            .unwrap()
    };

    let start = Instant::now();
    for i in 0..RECORDS {
        logger.info(format!("m{}", i));
    }
    let elapsed = start.elapsed();
    logger.close().unwrap();

    assert_eq!(sink.lines().len(), RECORDS);
    assert!(elapsed < Duration::from_secs(2), "logging took {:?}", elapsed);
    assert!(peak.load(Ordering::SeqCst) <= HOOK_WORKERS);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    drop(release_tx);
    assert!(wait_until(|| fired.load(Ordering::SeqCst) == RECORDS));
    assert_eq!(logger.metrics().hook_panics(), 0);
    assert_eq!(logger.metrics().hook_dispatch_failures(), 0);
}

#[test]
fn test_failing_sink_keeps_draining() {
    struct FlakySink {
        inner: MemorySink,
        calls: usize,
    }

    impl Sink for FlakySink {
        fn write(&mut self, record: &[u8]) -> Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(LoggerError::writer("Simulated failure"));
            }
            self.inner.write(record)
        }

        fn close(&mut self) -> Result<()> {
            self.inner.close()
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    let captured = MemorySink::new();
    let logger = Logger::new(
        FlakySink {
            inner: captured.clone(),
            calls: 0,
        },
        "",
        OutputFlags::empty(),
    )
    .unwrap();

    for i in 0..10 {
        logger.info(format!("m{}", i));
    }
    logger.close().unwrap();

    assert_eq!(captured.lines(), vec!["m0", "m2", "m4", "m6", "m8"]);
    assert_eq!(logger.metrics().write_failures(), 5);
    assert_eq!(logger.metrics().records_written(), 5);
}

#[test]
fn test_rotation_mode_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let delegate = RotatingFileLogger::new(temp_dir.path(), "svc", ".log", 1)
        .expect("Failed to open rotating file")
        .with_flags(OutputFlags::LEVEL);
    let logger = Logger::with_rotation(delegate);

    logger.set_output_level_name("info");
    logger.set_backup(2);
    logger.set_daily_rotate(false);
    logger.debug("hidden");
    logger.info("shown");
    logger.output("abc", LogLevel::Warn, "tagged").unwrap();
    logger.close().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("svc.log")).unwrap();
    assert_eq!(content, "[INFO]shown\n[abc][WARN]tagged\n");
    assert_eq!(logger.stat().total(), 2);
    assert!(logger.output("", LogLevel::Error, "late").is_err());
}

#[test]
fn test_independent_loggers() {
    let a = MemorySink::new();
    let b = MemorySink::new();
    let logger_a = Logger::new(a.clone(), "a ", OutputFlags::empty()).unwrap();
    let logger_b = Logger::new(b.clone(), "b ", OutputFlags::empty()).unwrap();

    logger_a.info("x");
    logger_b.info("y");
    logger_b.set_output_level(LogLevel::Error);
    logger_a.info("z");
    logger_b.info("hidden");
    logger_a.close().unwrap();
    logger_b.close().unwrap();

    assert_eq!(a.contents(), "a x\na z\n");
    assert_eq!(b.contents(), "b y\n");
}

#[test]
fn test_track_caller_wrapper_reports_outer_site() {
    #[track_caller]
    fn audit(logger: &Logger, what: &str) {
        logger.info(format!("audit: {}", what));
    }

    let sink = MemorySink::new();
    let logger = Logger::builder()
        .flags(OutputFlags::SHORT_FILE)
        .caller(true)
        .build(sink.clone())
        .unwrap();
    let line = line!() + 1;
    audit(&logger, "login");
    logger.close().unwrap();

    assert_eq!(
        sink.contents(),
        format!("integration_tests.rs:{} audit: login\n", line)
    );
}

#[test]
fn test_logger_from_config() {
    let config = LoggerConfig::from_json_str(
        r#"{ "prefix": "cfg ", "flags": ["level"], "level": "warn", "caller": false }"#,
    )
    .unwrap();
    let sink = MemorySink::new();
    let logger = LoggerBuilder::from_config(&config)
        .unwrap()
        .build(sink.clone())
        .unwrap();

    logger.info("skipped");
    logger.warn("kept");
    logger.close().unwrap();

    assert_eq!(sink.contents(), "cfg [WARN]kept\n");
}
