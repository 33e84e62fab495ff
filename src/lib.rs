//! # Rust Pipeline Logger
//!
//! An embeddable, asynchronous, line-oriented logging pipeline.
//!
//! ## Features
//!
//! - **Non-blocking producers**: records are formatted on the calling thread
//!   and queued for a single writer thread
//! - **Backpressure instead of loss**: a full queue blocks the producer, it
//!   never drops a record
//! - **Drain on close**: everything queued before `close` reaches the sink
//! - **Hooks**: fire-and-forget observers of every accepted record
//! - **Rotation delegate**: hand records to a rotation-aware writer instead
//!   of the queue

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallSite, Hook, Hooks, LevelStats, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, OutputFlags, PipelineMetrics, Result, RotationDelegate, Sink,
        HOOK_WORKERS, QUEUE_CAPACITY,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::{FileSink, RotatingFileLogger, RotationPolicy};
    pub use crate::sinks::{MemorySink, WriterSink};
}

pub use crate::core::{
    CallSite, HeaderConfig, Hook, Hooks, LevelStats, LogLevel, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, OutputFlags, PipelineMetrics, Result, RotationDelegate, Sink,
    HOOK_WORKERS, QUEUE_CAPACITY,
};
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::{FileSink, RotatingFileLogger, RotationPolicy};
pub use sinks::{MemorySink, WriterSink};
