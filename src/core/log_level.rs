//! Severity levels and the threshold check

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of levels that can actually be emitted (everything but `Silent`).
pub const EMITTING_LEVELS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Silent = 0,
    #[default]
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Panic = 5,
    Fatal = 6,
}

impl LogLevel {
    /// All levels that produce records, lowest first.
    pub const EMITTING: [LogLevel; EMITTING_LEVELS] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Panic,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "SILENT",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Lowercase name handed to hooks.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Silent => "silent",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Bracketed tag written into the header, e.g. `[INFO]`.
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Silent => "",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Error => "[ERROR]",
            LogLevel::Panic => "[PANIC]",
            LogLevel::Fatal => "[FATAL]",
        }
    }

    /// Whether a record at this level passes `threshold`.
    #[inline]
    pub fn passes(self, threshold: LogLevel) -> bool {
        self >= threshold
    }

    /// Slot in the per-level statistics array, `None` for `Silent`.
    #[inline]
    pub fn stat_index(self) -> Option<usize> {
        match self {
            LogLevel::Silent => None,
            level => Some(level as usize - 1),
        }
    }

    /// Map a numeric level, as used by older configuration files.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LogLevel::Silent),
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Warn),
            4 => Some(LogLevel::Error),
            5 => Some(LogLevel::Panic),
            6 => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    /// Resolve a threshold name, case-insensitively.
    ///
    /// Only `debug`, `info`, `warn` and `error` are threshold names; anything
    /// else resolves to `Info`.
    pub fn threshold_from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SILENT" => Ok(LogLevel::Silent),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "PANIC" => Ok(LogLevel::Panic),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
