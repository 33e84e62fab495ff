//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments only when the level is enabled, and
//! report the module, file and line of the macro invocation as the caller
//! site.
//!
//! # Examples
//!
//! ```
//! use rust_pipeline_logger::prelude::*;
//! use rust_pipeline_logger::info;
//!
//! let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! # logger.close().unwrap();
//! ```

/// Build a [`CallSite`](crate::CallSite) for the current source location.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(module_path!(), file!(), line!())
    };
}

/// Log a message at an explicit level.
///
/// Never terminates the process or panics, even at `Panic` or `Fatal`; use
/// [`panic_log!`] and [`fatal!`] for that.
///
/// # Examples
///
/// ```
/// # use rust_pipeline_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
/// use rust_pipeline_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// # logger.close().unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at($level, $crate::call_site!(), format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_pipeline_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
/// use rust_pipeline_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// # logger.close().unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_pipeline_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
/// use rust_pipeline_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// # logger.close().unwrap();
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at panic level, then panic with the same message.
///
/// # Examples
///
/// ```should_panic
/// # use rust_pipeline_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
/// use rust_pipeline_logger::panic_log;
/// panic_log!(logger, "invariant broken: {}", "queue underflow");
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic_at($crate::call_site!(), format_args!($($arg)+))
    };
}

/// Log at fatal level, drain the logger and exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use rust_pipeline_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::new(), "", OutputFlags::DEFAULT).unwrap();
/// use rust_pipeline_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_at($crate::call_site!(), format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, OutputFlags};
    use crate::sinks::MemorySink;

    fn logger(sink: &MemorySink, flags: OutputFlags) -> Logger {
        Logger::builder()
            .flags(flags)
            .caller(true)
            .build(sink.clone())
            .unwrap()
    }

    #[test]
    fn test_log_macro() {
        let sink = MemorySink::new();
        let logger = logger(&sink, OutputFlags::LEVEL);
        log!(logger, LogLevel::Warn, "Formatted: {}", 42);
        logger.close().unwrap();

        let line = sink.contents();
        assert!(line.starts_with("[WARN]macros.rs:"), "got {:?}", line);
        assert!(line.ends_with(" Formatted: 42\n"));
    }

    #[test]
    fn test_level_macros() {
        let sink = MemorySink::new();
        let logger = logger(&sink, OutputFlags::LEVEL);
        logger.set_caller(false);
        debug!(logger, "d {}", 1);
        info!(logger, "i");
        warn!(logger, "w");
        error!(logger, "e {}", "x");
        logger.close().unwrap();

        assert_eq!(sink.lines(), vec!["[DEBUG]d 1", "[INFO]i", "[WARN]w", "[ERROR]e x"]);
    }

    #[test]
    fn test_module_in_caller_segment() {
        let sink = MemorySink::new();
        let logger = logger(&sink, OutputFlags::MODULE | OutputFlags::SHORT_FILE);
        info!(logger, "m");
        logger.close().unwrap();

        assert!(sink
            .contents()
            .starts_with("rust_pipeline_logger::macros::tests:macros.rs:"));
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        struct Explodes;
        impl std::fmt::Display for Explodes {
            fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                panic!("formatted a disabled record");
            }
        }

        let sink = MemorySink::new();
        let logger = logger(&sink, OutputFlags::empty());
        logger.set_output_level(LogLevel::Error);
        debug!(logger, "{}", Explodes);
        logger.close().unwrap();
        assert_eq!(sink.contents(), "");
    }

    #[test]
    #[should_panic(expected = "code 3")]
    fn test_panic_log_macro() {
        let sink = MemorySink::new();
        let logger = logger(&sink, OutputFlags::empty());
        panic_log!(logger, "code {}", 3);
    }
}
