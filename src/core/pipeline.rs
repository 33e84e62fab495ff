//! Bounded record queue and its single consumer thread
//!
//! Producers push fully formatted records into a channel of fixed capacity
//! and block while it is full. One dedicated thread owns the [`Sink`] and
//! writes records in the order they arrived, so the sink itself needs no
//! lock. On close the consumer drains what is still queued, closes the
//! sink and exits.

use super::error::{LoggerError, Result};
use super::metrics::PipelineMetrics;
use super::sink::Sink;
use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Number of records that may wait for the consumer before producers block.
pub const QUEUE_CAPACITY: usize = 1000;

pub(crate) struct Pipeline {
    sender: Sender<Vec<u8>>,
    shutdown: Sender<()>,
    worker: Mutex<Option<thread::JoinHandle<Result<()>>>>,
    closed: AtomicBool,
    metrics: Arc<PipelineMetrics>,
}

impl Pipeline {
    /// Spawn the consumer thread; it owns `sink` from here on.
    pub(crate) fn start(sink: Box<dyn Sink>, metrics: Arc<PipelineMetrics>) -> Result<Self> {
        let (sender, receiver) = bounded::<Vec<u8>>(QUEUE_CAPACITY);
        let (shutdown, shutdown_rx) = bounded::<()>(1);
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name(format!("log-writer:{}", sink.name()))
            .spawn(move || consume(sink, receiver, shutdown_rx, worker_metrics))
            .map_err(|e| {
                LoggerError::io_operation("starting log writer", "failed to spawn consumer thread", e)
            })?;

        Ok(Self {
            sender,
            shutdown,
            worker: Mutex::new(Some(handle)),
            closed: AtomicBool::new(false),
            metrics,
        })
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Queue a record, waiting for room if the queue is full.
    pub(crate) fn enqueue(&self, record: Vec<u8>) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::LoggerStopped);
        }
        match self.sender.try_send(record) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(record)) => {
                self.metrics.record_block();
                self.sender
                    .send(record)
                    .map_err(|_| LoggerError::LoggerStopped)
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::LoggerStopped),
        }
    }

    /// Records waiting for the consumer.
    pub(crate) fn pending(&self) -> usize {
        self.sender.len()
    }

    /// Signal shutdown, wait for the drain and return the sink's close result.
    ///
    /// Only the first call does any work.
    pub(crate) fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        // capacity 1 and a single sender: never blocks
        let _ = self.shutdown.send(());

        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(_) => {
                    eprintln!("[LOGGER ERROR] Log writer thread panicked during shutdown");
                    Err(LoggerError::WriterPanicked)
                }
            },
            None => Ok(()),
        }
    }
}

fn consume(
    mut sink: Box<dyn Sink>,
    records: Receiver<Vec<u8>>,
    shutdown: Receiver<()>,
    metrics: Arc<PipelineMetrics>,
) -> Result<()> {
    loop {
        select! {
            recv(records) -> msg => match msg {
                Ok(record) => {
                    write_record(&mut *sink, &record, &metrics);
                    if records.is_empty() {
                        flush_sink(&mut *sink);
                    }
                }
                // every producer handle is gone and the queue is empty
                Err(_) => break,
            },
            // a disconnect here means the logger was dropped without close
            recv(shutdown) -> _ => {
                while let Ok(record) = records.try_recv() {
                    write_record(&mut *sink, &record, &metrics);
                }
                break;
            }
        }
    }
    sink.close()
}

/// Write failures and panics are counted, never retried, never fatal.
///
/// A returned error is dropped silently; a panic is also reported on stderr.
fn write_record(sink: &mut dyn Sink, record: &[u8], metrics: &PipelineMetrics) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write(record)));
    match result {
        Ok(Ok(_)) => {
            metrics.record_written();
        }
        Ok(Err(_)) => {
            metrics.record_write_failure();
        }
        Err(panic_info) => {
            metrics.record_write_failure();
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!("[LOGGER ERROR] Sink '{}' panicked: {}", sink.name(), panic_msg);
        }
    }
}

fn flush_sink(sink: &mut dyn Sink) {
    let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
}
