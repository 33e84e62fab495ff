//! Output capabilities the logger writes through

use super::error::Result;
use super::header::CallSite;
use super::log_level::LogLevel;

/// Final byte destination for the buffered pipeline.
///
/// Only the pipeline's consumer thread calls these methods, so an
/// implementation needs no locking of its own.
pub trait Sink: Send {
    /// Write one complete record.
    fn write(&mut self, record: &[u8]) -> Result<usize>;
    /// Called whenever the queue runs empty.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
    /// Flush and release the destination. Called once, after the final drain.
    fn close(&mut self) -> Result<()>;
    /// Names the consumer thread (`log-writer:<name>`) and panic reports.
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, record: &[u8]) -> Result<usize> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A rotation-aware writer that owns its own formatting, buffering and
/// rollover policy. A logger built in rotation mode forwards every accepted
/// record here instead of queueing it.
pub trait RotationDelegate: Send + Sync {
    fn output(&self, request_id: &str, level: LogLevel, site: &CallSite, text: &str) -> Result<()>;
    fn close(&self) -> Result<()>;
    fn set_output_level(&self, level: LogLevel);
    fn set_daily_rotate(&self, enabled: bool);
    fn set_backup(&self, count: usize);

    /// Toggle caller-site capture in the delegate's own headers.
    fn set_caller(&self, _enabled: bool) {}
}
