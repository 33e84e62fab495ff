//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    header::{CallSite, HeaderConfig},
    hooks::{Hook, HookDispatcher, Hooks},
    log_level::LogLevel,
    metrics::PipelineMetrics,
    output_flags::OutputFlags,
    pipeline::Pipeline,
    sink::{RotationDelegate, Sink},
    stats::LevelStats,
};
use chrono::Local;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// Configuration and counters, guarded together by one lock.
struct State {
    prefix: Arc<str>,
    flags: OutputFlags,
    threshold: LogLevel,
    caller: bool,
    stats: LevelStats,
}

/// Where accepted records go. Chosen at construction, never switched.
enum Output {
    Buffered(Pipeline),
    Rotating(Box<dyn RotationDelegate>),
}

/// An asynchronous, line-oriented logger.
///
/// In buffered mode every accepted record is formatted on the calling
/// thread, handed to the hooks and queued for a dedicated writer thread.
/// In rotation mode records go straight to a [`RotationDelegate`].
///
/// `Logger` is `Send + Sync`; share it by reference or behind an `Arc`.
///
/// # Example
///
/// ```
/// use rust_pipeline_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::new(sink.clone(), "svc ", OutputFlags::LEVEL).unwrap();
///
/// logger.info("ready");
/// logger.close().unwrap();
///
/// assert_eq!(sink.contents(), "svc [INFO]ready\n");
/// ```
pub struct Logger {
    state: Mutex<State>,
    hooks: RwLock<Arc<Hooks>>,
    dispatcher: HookDispatcher,
    output: Output,
    metrics: Arc<PipelineMetrics>,
}

impl Logger {
    /// Start a buffered logger writing to `sink`.
    ///
    /// The writer thread starts immediately. Every level is emitted until
    /// [`set_output_level`](Self::set_output_level) says otherwise.
    pub fn new<S: Sink + 'static>(
        sink: S,
        prefix: impl Into<Arc<str>>,
        flags: OutputFlags,
    ) -> Result<Self> {
        Logger::builder().prefix(prefix).flags(flags).build(sink)
    }

    /// Build a logger that forwards every accepted record to `delegate`.
    ///
    /// The delegate renders its own headers, so there is no prefix or flag
    /// argument here; configure those on the delegate (for example
    /// [`RotatingFileLogger::with_prefix`](crate::sinks::RotatingFileLogger::with_prefix)).
    pub fn with_rotation<D: RotationDelegate + 'static>(delegate: D) -> Self {
        Logger::builder().build_rotating(delegate)
    }

    fn from_parts(builder: LoggerBuilder, output: Output, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            state: Mutex::new(State {
                prefix: builder.prefix,
                flags: builder.flags,
                threshold: builder.level,
                caller: builder.caller,
                stats: LevelStats::default(),
            }),
            hooks: RwLock::new(Arc::new(builder.hooks)),
            dispatcher: HookDispatcher::new(Arc::clone(&metrics)),
            output,
            metrics,
        }
    }

    /// Whether this logger forwards to a rotation delegate.
    pub fn is_rotating(&self) -> bool {
        matches!(self.output, Output::Rotating(_))
    }

    /// Replace the whole hook set.
    pub fn set_hooks(&self, hooks: Hooks) {
        *self.hooks.write() = Arc::new(hooks);
    }

    /// Register `hook` as the only hook.
    pub fn set_hook<H: Hook + 'static>(&self, hook: H) {
        self.set_hooks(Hooks::new().with(hook));
    }

    /// Enable or disable the caller segment in headers.
    pub fn set_caller(&self, enabled: bool) {
        let mut state = self.state.lock();
        state.caller = enabled;
        if let Output::Rotating(delegate) = &self.output {
            delegate.set_caller(enabled);
        }
    }

    /// Whether a record at `level` would currently be accepted.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Silent && level.passes(self.state.lock().threshold)
    }

    /// Emit one record, reporting the caller of this method as its site.
    ///
    /// Wrappers that should not appear as the site can mark themselves
    /// `#[track_caller]`.
    #[track_caller]
    pub fn output(&self, request_id: &str, level: LogLevel, message: &str) -> Result<()> {
        self.output_at(request_id, level, CallSite::caller(), message)
    }

    /// Emit one record with an explicit call site.
    ///
    /// Records below the threshold return `Ok(())` without doing anything
    /// else. Accepted records are counted, formatted, shown to the hooks and
    /// queued; when the queue is full this call blocks until the writer
    /// makes room.
    pub fn output_at(
        &self,
        request_id: &str,
        level: LogLevel,
        site: CallSite,
        message: &str,
    ) -> Result<()> {
        if level == LogLevel::Silent {
            return Err(LoggerError::InvalidLevel(level));
        }

        match &self.output {
            Output::Rotating(delegate) => {
                {
                    let mut state = self.state.lock();
                    if !level.passes(state.threshold) {
                        return Ok(());
                    }
                    state.stats.increment(level);
                }
                delegate.output(request_id, level, &site, message)
            }
            Output::Buffered(pipeline) => {
                if pipeline.is_closed() {
                    return Err(LoggerError::LoggerStopped);
                }
                let config = {
                    let mut state = self.state.lock();
                    if !level.passes(state.threshold) {
                        return Ok(());
                    }
                    state.stats.increment(level);
                    HeaderConfig {
                        prefix: Arc::clone(&state.prefix),
                        flags: state.flags,
                        caller: state.caller,
                    }
                };

                let record = config.record(&Local::now(), level, request_id, Some(&site), message);

                let hooks = Arc::clone(&*self.hooks.read());
                if !hooks.is_empty() {
                    let content: Arc<[u8]> = Arc::from(record.as_slice());
                    self.dispatcher.dispatch(&hooks, level.name(), &content);
                }

                pipeline.enqueue(record)
            }
        }
    }

    /// Emit with a correlation id; errors are discarded like the level methods.
    #[track_caller]
    pub fn output_with_id(&self, request_id: &str, level: LogLevel, message: impl AsRef<str>) {
        let _ = self.output_at(request_id, level, CallSite::caller(), message.as_ref());
    }

    /// Format and emit only if `level` is enabled. Used by the macros.
    pub fn log_at(&self, level: LogLevel, site: CallSite, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        let _ = self.output_at("", level, site, &args.to_string());
    }

    #[track_caller]
    fn emit(&self, level: LogLevel, message: &str) {
        let _ = self.output_at("", level, CallSite::caller(), message);
    }

    #[track_caller]
    fn emit_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        let _ = self.output_at("", level, CallSite::caller(), &args.to_string());
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Debug, message.as_ref());
    }

    #[track_caller]
    #[inline]
    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(LogLevel::Debug, args);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Info, message.as_ref());
    }

    #[track_caller]
    #[inline]
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(LogLevel::Info, args);
    }

    /// Same as [`info`](Self::info).
    #[track_caller]
    #[inline]
    pub fn print(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Info, message.as_ref());
    }

    #[track_caller]
    #[inline]
    pub fn print_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(LogLevel::Info, args);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Warn, message.as_ref());
    }

    #[track_caller]
    #[inline]
    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(LogLevel::Warn, args);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Error, message.as_ref());
    }

    #[track_caller]
    #[inline]
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.emit_fmt(LogLevel::Error, args);
    }

    /// Log `message` at Error, followed by a backtrace of the current thread.
    #[track_caller]
    pub fn stack(&self, message: impl AsRef<str>) {
        if !self.is_enabled(LogLevel::Error) {
            return;
        }
        let trace = std::backtrace::Backtrace::force_capture();
        let text = format!("{}\n{}\n", message.as_ref(), trace);
        self.emit(LogLevel::Error, &text);
    }

    /// Log at Panic, then panic with the same message.
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        self.emit(LogLevel::Panic, message);
        panic!("{}", message);
    }

    #[track_caller]
    pub fn panic_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.panic(args.to_string())
    }

    /// Panic counterpart of [`log_at`](Self::log_at), used by `panic_log!`.
    pub fn panic_at(&self, site: CallSite, args: fmt::Arguments<'_>) -> ! {
        let message = args.to_string();
        let _ = self.output_at("", LogLevel::Panic, site, &message);
        panic!("{}", message);
    }

    /// Log at Fatal, drain everything queued to the sink, then exit with
    /// status 1.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.emit(LogLevel::Fatal, message.as_ref());
        self.exit_fatal()
    }

    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal(args.to_string())
    }

    /// Fatal counterpart of [`log_at`](Self::log_at), used by `fatal!`.
    pub fn fatal_at(&self, site: CallSite, args: fmt::Arguments<'_>) -> ! {
        let _ = self.output_at("", LogLevel::Fatal, site, &args.to_string());
        self.exit_fatal()
    }

    fn exit_fatal(&self) -> ! {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close logger before exit: {}", e);
        }
        std::process::exit(1)
    }

    /// Snapshot of the per-level counters.
    pub fn stat(&self) -> LevelStats {
        self.state.lock().stats
    }

    pub fn flags(&self) -> OutputFlags {
        self.state.lock().flags
    }

    pub fn set_flags(&self, flags: OutputFlags) {
        self.state.lock().flags = flags;
    }

    pub fn prefix(&self) -> String {
        self.state.lock().prefix.to_string()
    }

    pub fn set_prefix(&self, prefix: impl Into<Arc<str>>) {
        self.state.lock().prefix = prefix.into();
    }

    pub fn output_level(&self) -> LogLevel {
        self.state.lock().threshold
    }

    pub fn set_output_level(&self, level: LogLevel) {
        let mut state = self.state.lock();
        state.threshold = level;
        if let Output::Rotating(delegate) = &self.output {
            delegate.set_output_level(level);
        }
    }

    /// Set the threshold by name; unknown names select Info.
    pub fn set_output_level_name(&self, name: &str) {
        self.set_output_level(LogLevel::threshold_from_name(name));
    }

    /// Forwarded to the rotation delegate; no effect in buffered mode.
    pub fn set_daily_rotate(&self, daily: bool) {
        let _state = self.state.lock();
        if let Output::Rotating(delegate) = &self.output {
            delegate.set_daily_rotate(daily);
        }
    }

    /// Forwarded to the rotation delegate; no effect in buffered mode.
    pub fn set_backup(&self, count: usize) {
        let _state = self.state.lock();
        if let Output::Rotating(delegate) = &self.output {
            delegate.set_backup(count);
        }
    }

    /// Writer-side counters: records written, failures, blocked enqueues.
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Records queued but not yet taken by the writer thread.
    pub fn pending(&self) -> usize {
        match &self.output {
            Output::Buffered(pipeline) => pipeline.pending(),
            Output::Rotating(_) => 0,
        }
    }

    /// Stop the logger.
    ///
    /// Everything queued before this call is written to the sink, then the
    /// sink is closed. Later calls return `Ok(())`; later records are
    /// rejected with [`LoggerError::LoggerStopped`].
    pub fn close(&self) -> Result<()> {
        match &self.output {
            Output::Buffered(pipeline) => pipeline.close(),
            Output::Rotating(delegate) => delegate.close(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("prefix", &state.prefix)
            .field("flags", &state.flags)
            .field("threshold", &state.threshold)
            .field("caller", &state.caller)
            .field("rotating", &self.is_rotating())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_pipeline_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .prefix("api ")
///     .flags(OutputFlags::STD | OutputFlags::LEVEL)
///     .level(LogLevel::Info)
///     .caller(true)
///     .build(MemorySink::new())
///     .unwrap();
///
/// assert_eq!(logger.output_level(), LogLevel::Info);
/// logger.close().unwrap();
/// ```
pub struct LoggerBuilder {
    prefix: Arc<str>,
    flags: OutputFlags,
    level: LogLevel,
    caller: bool,
    hooks: Hooks,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            prefix: Arc::from(""),
            flags: OutputFlags::DEFAULT,
            level: LogLevel::Debug,
            caller: false,
            hooks: Hooks::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<Arc<str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: OutputFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enable the caller segment
    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, enabled: bool) -> Self {
        self.caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks = self.hooks.with(hook);
        self
    }

    /// Build a buffered logger and start its writer thread.
    pub fn build<S: Sink + 'static>(self, sink: S) -> Result<Logger> {
        let metrics = Arc::new(PipelineMetrics::new());
        let pipeline = Pipeline::start(Box::new(sink), Arc::clone(&metrics))?;
        Ok(Logger::from_parts(self, Output::Buffered(pipeline), metrics))
    }

    /// Build a logger in rotation mode.
    ///
    /// The threshold and caller setting are pushed to the delegate as well.
    /// Prefix and flags stay local: the delegate formats its own records, so
    /// they only show up in [`Logger::prefix`] and [`Logger::flags`]. Hooks
    /// are never fired in this mode.
    pub fn build_rotating<D: RotationDelegate + 'static>(self, delegate: D) -> Logger {
        delegate.set_output_level(self.level);
        delegate.set_caller(self.caller);
        Logger::from_parts(
            self,
            Output::Rotating(Box::new(delegate)),
            Arc::new(PipelineMetrics::new()),
        )
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
