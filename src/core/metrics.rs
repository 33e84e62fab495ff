//! Pipeline metrics for observability
//!
//! Counts what happens after a record is accepted: sink writes, sink
//! failures, producers throttled by a full queue, and hooks that panicked
//! or could not be handed to a worker.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// # Example
///
/// ```
/// use rust_pipeline_logger::PipelineMetrics;
///
/// let metrics = PipelineMetrics::new();
///
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct PipelineMetrics {
    /// Records the consumer handed to the sink successfully
    records_written: AtomicU64,

    /// Sink writes that returned an error
    write_failures: AtomicU64,

    /// Producers that found the queue full and had to wait
    block_events: AtomicU64,

    /// Hook invocations that panicked
    hook_panics: AtomicU64,

    /// Hook invocations dropped because no hook worker was running
    hook_dispatch_failures: AtomicU64,
}

impl PipelineMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            hook_panics: AtomicU64::new(0),
            hook_dispatch_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Number of enqueues that blocked on a full queue
    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_panics(&self) -> u64 {
        self.hook_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_dispatch_failures(&self) -> u64 {
        self.hook_dispatch_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_panic(&self) -> u64 {
        self.hook_panics.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_dispatch_failure(&self) -> u64 {
        self.hook_dispatch_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of sink writes that failed, as a percentage (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PipelineMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            block_events: AtomicU64::new(self.block_events()),
            hook_panics: AtomicU64::new(self.hook_panics()),
            hook_dispatch_failures: AtomicU64::new(self.hook_dispatch_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.block_events(), 0);
        assert_eq!(metrics.hook_panics(), 0);
        assert_eq!(metrics.hook_dispatch_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.record_block(), 0);
        assert_eq!(metrics.record_block(), 1);
        assert_eq!(metrics.block_events(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = PipelineMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_write_failure();
        }
        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_clone_is_snapshot() {
        let metrics = PipelineMetrics::new();
        metrics.record_written();

        let snapshot = metrics.clone();
        metrics.record_written();

        assert_eq!(snapshot.records_written(), 1);
        assert_eq!(metrics.records_written(), 2);
    }
}
