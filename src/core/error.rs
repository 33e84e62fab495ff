//! Error types for the logging pipeline

use super::log_level::LogLevel;
use std::io;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure, with what was being attempted
    #[error("I/O error while {operation}: {detail}")]
    Io {
        operation: String,
        detail: String,
        #[source]
        source: io::Error,
    },

    /// Bare I/O failure from a sink's writer
    #[error(transparent)]
    RawIo(#[from] io::Error),

    #[error("malformed logger configuration: {0}")]
    ConfigSyntax(#[from] serde_json::Error),

    /// Output after `close`, or the writer thread is gone
    #[error("logger is closed")]
    LoggerStopped,

    #[error("records cannot be emitted at level {0}")]
    InvalidLevel(LogLevel),

    #[error("invalid `{field}` setting: {message}")]
    InvalidConfiguration { field: &'static str, message: String },

    #[error("cannot write log file '{path}': {message}")]
    FileSink { path: String, message: String },

    #[error("rotating '{path}' failed: {message}")]
    Rotation { path: String, message: String },

    /// A sink refused a record
    #[error("sink error: {0}")]
    Sink(String),

    #[error("log writer thread panicked")]
    WriterPanicked,
}

impl LoggerError {
    pub fn io_operation(
        operation: impl Into<String>,
        detail: impl Into<String>,
        source: io::Error,
    ) -> Self {
        LoggerError::Io {
            operation: operation.into(),
            detail: detail.into(),
            source,
        }
    }

    pub fn config(field: &'static str, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            field,
            message: message.into(),
        }
    }

    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSink {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Error for sinks to return from [`Sink::write`](crate::Sink::write).
    pub fn writer(message: impl Into<String>) -> Self {
        LoggerError::Sink(message.into())
    }
}
