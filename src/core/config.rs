//! Declarative logger configuration
//!
//! ```
//! use rust_pipeline_logger::prelude::*;
//!
//! let config = LoggerConfig::from_json_str(
//!     r#"{ "prefix": "svc ", "flags": ["date", "time", "level"], "level": "warn" }"#,
//! )
//! .unwrap();
//!
//! let logger = LoggerBuilder::from_config(&config)
//!     .unwrap()
//!     .build(MemorySink::new())
//!     .unwrap();
//! assert_eq!(logger.output_level(), LogLevel::Warn);
//! logger.close().unwrap();
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::LoggerBuilder;
use super::output_flags::OutputFlags;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub prefix: String,
    /// Flag names, see [`OutputFlags::from_name`].
    pub flags: Vec<String>,
    /// Threshold name; unknown names mean `info`.
    pub level: String,
    pub caller: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            flags: vec!["default".to_string()],
            level: "debug".to_string(),
            caller: false,
        }
    }
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&text)
    }

    pub fn output_flags(&self) -> Result<OutputFlags> {
        OutputFlags::from_names(&self.flags)
    }

    pub fn threshold(&self) -> LogLevel {
        LogLevel::threshold_from_name(&self.level)
    }
}

impl LoggerBuilder {
    /// Start a builder from a configuration; fails only on unknown flags.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Ok(LoggerBuilder::new()
            .prefix(config.prefix.as_str())
            .flags(config.output_flags()?)
            .level(config.threshold())
            .caller(config.caller))
    }
}
