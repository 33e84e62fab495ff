//! Fire-and-forget notification of accepted records
//!
//! Every accepted record is handed to each registered [`Hook`] through a
//! small, fixed set of worker threads. The producer only pushes a job onto
//! an unbounded channel, so a slow hook holds up other hook invocations but
//! never the logger. A panicking hook is caught and counted.

use super::metrics::PipelineMetrics;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::thread;

/// Worker threads each logger runs its hooks on.
pub const HOOK_WORKERS: usize = 4;

/// External observer of accepted records.
///
/// # Example
///
/// ```
/// use rust_pipeline_logger::Hook;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct ErrorCounter(AtomicUsize);
///
/// impl Hook for ErrorCounter {
///     fn fire(&self, level: &str, _content: &[u8]) {
///         if level == "error" {
///             self.0.fetch_add(1, Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    /// `level` is the lowercase level name, `content` the formatted record.
    fn fire(&self, level: &str, content: &[u8]);
}

impl<F> Hook for F
where
    F: Fn(&str, &[u8]) + Send + Sync,
{
    fn fire(&self, level: &str, content: &[u8]) {
        self(level, content)
    }
}

/// The set of hooks a logger notifies. Replaced wholesale, never edited.
#[derive(Clone, Default)]
pub struct Hooks {
    hooks: Vec<Arc<dyn Hook>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_shared(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks").field("len", &self.hooks.len()).finish()
    }
}

struct HookJob {
    hook: Arc<dyn Hook>,
    level: &'static str,
    content: Arc<[u8]>,
}

/// Per-logger hook executor.
///
/// Workers start on the first dispatch and exit once the dispatcher is
/// dropped and every queued job has run.
pub(crate) struct HookDispatcher {
    jobs: OnceLock<Sender<HookJob>>,
    metrics: Arc<PipelineMetrics>,
}

impl HookDispatcher {
    pub(crate) fn new(metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            jobs: OnceLock::new(),
            metrics,
        }
    }

    /// Queue one invocation per hook and return without waiting.
    pub(crate) fn dispatch(&self, hooks: &Hooks, level: &'static str, content: &Arc<[u8]>) {
        if hooks.is_empty() {
            return;
        }
        let jobs = self.jobs.get_or_init(|| start_workers(&self.metrics));
        for hook in &hooks.hooks {
            let job = HookJob {
                hook: Arc::clone(hook),
                level,
                content: Arc::clone(content),
            };
            if jobs.send(job).is_err() {
                self.metrics.record_hook_dispatch_failure();
            }
        }
    }
}

/// A worker that fails to spawn drops its receiver; if none start, every
/// send fails and is counted as a dispatch failure.
fn start_workers(metrics: &Arc<PipelineMetrics>) -> Sender<HookJob> {
    let (sender, receiver) = unbounded::<HookJob>();
    for idx in 0..HOOK_WORKERS {
        let jobs = receiver.clone();
        let worker_metrics = Arc::clone(metrics);
        let spawned = thread::Builder::new()
            .name(format!("log-hook-{}", idx))
            .spawn(move || run_hooks(jobs, worker_metrics));
        if let Err(e) = spawned {
            eprintln!("[LOGGER ERROR] Failed to start hook worker #{}: {}", idx, e);
        }
    }
    sender
}

fn run_hooks(jobs: Receiver<HookJob>, metrics: Arc<PipelineMetrics>) {
    for job in jobs.iter() {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            job.hook.fire(job.level, &job.content)
        }));
        if let Err(panic_info) = result {
            metrics.record_hook_panic();
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!(
                "[LOGGER ERROR] Hook panicked on a {} record: {}",
                job.level, panic_msg
            );
        }
    }
}
