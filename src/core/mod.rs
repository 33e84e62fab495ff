//! Core logger types and traits

pub mod config;
pub mod error;
pub mod header;
pub mod hooks;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_flags;
pub mod pipeline;
pub mod sink;
pub mod stats;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use header::{CallSite, HeaderConfig};
pub use hooks::{Hook, Hooks, HOOK_WORKERS};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::PipelineMetrics;
pub use output_flags::OutputFlags;
pub use pipeline::QUEUE_CAPACITY;
pub use sink::{RotationDelegate, Sink};
pub use stats::LevelStats;
