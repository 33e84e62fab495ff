//! Header flags controlling which segments are written before each message
//!
//! Flags combine with `|`:
//!
//! ```
//! use rust_pipeline_logger::OutputFlags;
//!
//! let flags = OutputFlags::DATE | OutputFlags::TIME | OutputFlags::LEVEL;
//! assert!(flags.contains(OutputFlags::TIME));
//! assert!(!flags.contains(OutputFlags::MICROSECONDS));
//! ```

use super::error::{LoggerError, Result};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OutputFlags(u32);

impl OutputFlags {
    /// `[2024-01-23 `
    pub const DATE: OutputFlags = OutputFlags(1 << 0);
    /// `01:23:23] `
    pub const TIME: OutputFlags = OutputFlags(1 << 1);
    /// `01:23:23.123123] `, implies TIME
    pub const MICROSECONDS: OutputFlags = OutputFlags(1 << 2);
    /// full source path in the caller segment
    pub const LONG_FILE: OutputFlags = OutputFlags(1 << 3);
    /// final path element only; overrides LONG_FILE
    pub const SHORT_FILE: OutputFlags = OutputFlags(1 << 4);
    /// module path in the caller segment
    pub const MODULE: OutputFlags = OutputFlags(1 << 5);
    /// `[INFO]`
    pub const LEVEL: OutputFlags = OutputFlags(1 << 6);

    pub const STD: OutputFlags =
        OutputFlags(Self::DATE.0 | Self::TIME.0 | Self::MICROSECONDS.0);
    pub const DEFAULT: OutputFlags =
        OutputFlags(Self::MODULE.0 | Self::LEVEL.0 | Self::SHORT_FILE.0 | Self::STD.0);

    pub const fn empty() -> Self {
        OutputFlags(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, discarding unknown ones.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        OutputFlags(bits & 0x7f)
    }

    #[inline]
    pub const fn contains(self, other: OutputFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: OutputFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Look up a single flag by its configuration name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::DATE),
            "time" => Ok(Self::TIME),
            "microseconds" | "micros" => Ok(Self::MICROSECONDS),
            "longfile" | "long_file" => Ok(Self::LONG_FILE),
            "shortfile" | "short_file" => Ok(Self::SHORT_FILE),
            "module" => Ok(Self::MODULE),
            "level" => Ok(Self::LEVEL),
            "std" => Ok(Self::STD),
            "default" => Ok(Self::DEFAULT),
            other => Err(LoggerError::config(
                "flags",
                format!("unknown output flag '{}'", other),
            )),
        }
    }

    /// Combine a list of flag names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        names
            .iter()
            .try_fold(Self::empty(), |acc, name| Ok(acc | Self::from_name(name.as_ref())?))
    }
}

impl BitOr for OutputFlags {
    type Output = OutputFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        OutputFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OutputFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for OutputFlags {
    type Output = OutputFlags;

    fn bitand(self, rhs: Self) -> Self::Output {
        OutputFlags(self.0 & rhs.0)
    }
}

impl fmt::Display for OutputFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(OutputFlags, &str); 7] = [
            (OutputFlags::DATE, "date"),
            (OutputFlags::TIME, "time"),
            (OutputFlags::MICROSECONDS, "microseconds"),
            (OutputFlags::LONG_FILE, "longfile"),
            (OutputFlags::SHORT_FILE, "shortfile"),
            (OutputFlags::MODULE, "module"),
            (OutputFlags::LEVEL, "level"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}
