//! Per-level emitted-record counters

use super::log_level::{LogLevel, EMITTING_LEVELS};
use serde::Serialize;

/// Snapshot of how many records were accepted at each level.
///
/// Returned by value from [`Logger::stat`](crate::Logger::stat); later
/// logging never changes a snapshot already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    counts: [u64; EMITTING_LEVELS],
}

impl LevelStats {
    pub(crate) fn increment(&mut self, level: LogLevel) {
        if let Some(idx) = level.stat_index() {
            self.counts[idx] += 1;
        }
    }

    /// Count for one level; always zero for `Silent`.
    pub fn get(&self, level: LogLevel) -> u64 {
        level.stat_index().map_or(0, |idx| self.counts[idx])
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts ordered Debug, Info, Warn, Error, Panic, Fatal.
    pub fn as_array(&self) -> [u64; EMITTING_LEVELS] {
        self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogLevel, u64)> + '_ {
        LogLevel::EMITTING.iter().copied().zip(self.counts.iter().copied())
    }
}
