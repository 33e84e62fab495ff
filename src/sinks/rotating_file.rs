//! Rotation delegate writing to a size- and day-rotated file
//!
//! The active file is `<dir>/<prefix><suffix>`. On rotation it becomes
//! `.1`, the previous `.1` becomes `.2` and so on up to the backup count;
//! the oldest is removed. Rotated files can be gzip-compressed.

use crate::core::{
    CallSite, HeaderConfig, LogLevel, LoggerError, OutputFlags, Result, RotationDelegate,
};
use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// When and how to roll the active file over.
///
/// # Examples
///
/// ```
/// use rust_pipeline_logger::sinks::RotationPolicy;
///
/// // Roll over at 50 MiB or at midnight, keep a week of gzipped backups
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_daily(true)
///     .with_max_backups(7)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, Some(50 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the active file reaches this many bytes
    pub max_bytes: Option<u64>,
    /// Rotate when the local date changes
    pub daily: bool,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Whether to compress rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: Some(10 * 1024 * 1024), // 10 MiB
            daily: false,
            max_backup_files: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    /// Never rotate on size.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn without_size_limit(mut self) -> Self {
        self.max_bytes = None;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_daily(mut self, daily: bool) -> Self {
        self.daily = daily;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

struct Inner {
    base_path: PathBuf,
    policy: RotationPolicy,
    header: HeaderConfig,
    threshold: LogLevel,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    /// Local date the active file was opened on (for daily rotation)
    opened_on: NaiveDate,
    /// Consecutive failures to delete the oldest backup
    deletion_failure_count: usize,
    closed: bool,
}

/// A [`RotationDelegate`] that formats records itself and writes them
/// synchronously, flushing after every record.
///
/// # Examples
///
/// ```no_run
/// use rust_pipeline_logger::prelude::*;
/// use rust_pipeline_logger::sinks::RotatingFileLogger;
///
/// let delegate = RotatingFileLogger::new("/var/log/svc", "svc", ".log", 100).unwrap();
/// let logger = Logger::with_rotation(delegate);
/// logger.set_daily_rotate(true);
/// logger.set_backup(7);
/// logger.info("started");
/// logger.close().unwrap();
/// ```
pub struct RotatingFileLogger {
    inner: Mutex<Inner>,
}

impl RotatingFileLogger {
    /// Open `<dir>/<prefix><suffix>`, rotating at `max_size_mb` MiB.
    pub fn new(
        dir: impl AsRef<Path>,
        prefix: &str,
        suffix: &str,
        max_size_mb: u64,
    ) -> Result<Self> {
        let path = dir.as_ref().join(format!("{}{}", prefix, suffix));
        let policy = RotationPolicy::new().with_max_size(max_size_mb * 1024 * 1024);
        Self::with_policy(path, policy)
    }

    /// Open `path` with a custom policy.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn with_policy(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = open_append(&base_path)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                base_path,
                policy,
                header: HeaderConfig::new("", OutputFlags::DEFAULT),
                threshold: LogLevel::Debug,
                writer: Some(BufWriter::new(file)),
                current_size,
                opened_on: Local::now().date_naive(),
                deletion_failure_count: 0,
                closed: false,
            }),
        })
    }

    /// Header flags for records written by this delegate.
    #[must_use]
    pub fn with_flags(self, flags: OutputFlags) -> Self {
        self.inner.lock().header.flags = flags;
        self
    }

    /// Prefix for records written by this delegate.
    #[must_use]
    pub fn with_prefix(self, prefix: &str) -> Self {
        self.inner.lock().header.prefix = prefix.into();
        self
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().base_path.clone()
    }

    pub fn policy(&self) -> RotationPolicy {
        self.inner.lock().policy.clone()
    }

    /// Size of the active file in bytes
    pub fn current_size(&self) -> u64 {
        self.inner.lock().current_size
    }
}

impl Inner {
    fn should_rotate(&self, today: NaiveDate) -> bool {
        let size_exceeded = self
            .policy
            .max_bytes
            .is_some_and(|max| self.current_size > 0 && self.current_size >= max);
        let day_changed = self.policy.daily && today != self.opened_on;
        size_exceeded || day_changed
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    fn rotate(&mut self, today: NaiveDate) -> Result<()> {
        // Explicitly drop writer to release file handle before renaming
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let max_backups = self.policy.max_backup_files;
        if max_backups == 0 {
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to truncate log file: {}", e),
                    )
                })?;
            }
        } else {
            self.remove_oldest_backup(max_backups)?;

            for i in (1..max_backups).rev() {
                for (from, to) in [
                    (self.backup_path(i), self.backup_path(i + 1)),
                    (gz_path(&self.backup_path(i)), gz_path(&self.backup_path(i + 1))),
                ] {
                    if from.exists() {
                        fs::rename(&from, &to).map_err(|e| {
                            LoggerError::file_rotation(
                                from.display().to_string(),
                                format!("Failed to rotate backup files: {}", e),
                            )
                        })?;
                    }
                }
            }

            let first = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &first).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
                if self.policy.compress {
                    compress_file(&first)?;
                }
            }
        }

        let (file, size) = open_append(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.opened_on = today;
        Ok(())
    }

    fn remove_oldest_backup(&mut self, max_backups: usize) -> Result<()> {
        const MAX_DELETION_FAILURES: usize = 5;

        let oldest = self.backup_path(max_backups);
        let mut deletion_failed = false;
        for path in [gz_path(&oldest), oldest] {
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    deletion_failed = true;
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        path.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        if !deletion_failed {
            self.deletion_failure_count = 0;
            return Ok(());
        }
        self.deletion_failure_count += 1;
        if self.deletion_failure_count >= MAX_DELETION_FAILURES {
            return Err(LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!(
                    "Rotation aborted: failed to delete old backup files {} consecutive times",
                    self.deletion_failure_count
                ),
            ));
        }
        Ok(())
    }

    /// Keep logging to the current file when rotation fails.
    fn recover_from_failed_rotation(&mut self, err: &LoggerError, today: NaiveDate) -> Result<()> {
        eprintln!(
            "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
            err
        );
        if self.writer.is_none() {
            let (file, size) = open_append(&self.base_path)?;
            self.writer = Some(BufWriter::new(file));
            self.current_size = size;
        }
        // allow the file to grow past the limit rather than retry on every record
        self.current_size = 0;
        self.opened_on = today;
        Ok(())
    }
}

impl RotationDelegate for RotatingFileLogger {
    fn output(&self, request_id: &str, level: LogLevel, site: &CallSite, text: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(LoggerError::LoggerStopped);
        }
        if !level.passes(inner.threshold) {
            return Ok(());
        }

        let now = Local::now();
        let today = now.date_naive();
        if inner.should_rotate(today) {
            if let Err(e) = inner.rotate(today) {
                inner.recover_from_failed_rotation(&e, today)?;
            }
        }

        let record = inner.header.record(&now, level, request_id, Some(site), text);
        let path = inner.base_path.display().to_string();
        let writer = inner
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer
            .write_all(&record)
            .and_then(|_| writer.flush())
            .map_err(|e| LoggerError::file_sink(path, format!("Failed to write log entry: {}", e)))?;
        inner.current_size += record.len() as u64;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.closed = true;
        if let Some(mut writer) = inner.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn set_output_level(&self, level: LogLevel) {
        self.inner.lock().threshold = level;
    }

    fn set_daily_rotate(&self, enabled: bool) {
        self.inner.lock().policy.daily = enabled;
    }

    fn set_backup(&self, count: usize) {
        self.inner.lock().policy.max_backup_files = count;
    }

    fn set_caller(&self, enabled: bool) {
        self.inner.lock().header.caller = enabled;
    }
}

fn open_append(path: &Path) -> Result<(File, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
        })?;
    let size = file
        .metadata()
        .map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?
        .len();
    Ok((file, size))
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` next to itself, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let gz = gz_path(path);
    let mut tmp = gz.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}
