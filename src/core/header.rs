//! Record formatting: header segments followed by the message
//!
//! A header is built from, in this order and only when enabled:
//! prefix, `[YYYY-MM-DD `, `HH:MM:SS[.micros]] `, `[request-id]`, `[LEVEL]`
//! and the caller segment `module:file:line `.

use super::log_level::LogLevel;
use super::output_flags::OutputFlags;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::fmt::Write;
use std::panic::Location;
use std::sync::Arc;

/// Source location reported in the caller segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    module: Option<&'static str>,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// A fully known site, as produced by the logging macros.
    pub const fn new(module: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            module: Some(module),
            file,
            line,
        }
    }

    /// The site of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            module: None,
            file: location.file(),
            line: location.line(),
        }
    }

    pub fn module(&self) -> Option<&'static str> {
        self.module
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    fn short_file(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// The configuration fields a single record needs, copied out of the
/// logger's lock so formatting runs unlocked.
#[derive(Debug, Clone)]
pub struct HeaderConfig {
    pub prefix: Arc<str>,
    pub flags: OutputFlags,
    pub caller: bool,
}

impl HeaderConfig {
    pub fn new(prefix: impl Into<Arc<str>>, flags: OutputFlags) -> Self {
        Self {
            prefix: prefix.into(),
            flags,
            caller: false,
        }
    }

    /// Render the header for one record.
    pub fn header(
        &self,
        now: &DateTime<Local>,
        level: LogLevel,
        request_id: &str,
        site: Option<&CallSite>,
    ) -> String {
        let flags = self.flags;
        let mut out = String::with_capacity(self.prefix.len() + 64);
        out.push_str(&self.prefix);

        if flags.contains(OutputFlags::DATE) {
            let _ = write!(out, "[{}-{:02}-{:02} ", now.year(), now.month(), now.day());
        }
        if flags.intersects(OutputFlags::TIME | OutputFlags::MICROSECONDS) {
            let _ = write!(
                out,
                "{:02}:{:02}:{:02}",
                now.hour(),
                now.minute(),
                now.second()
            );
            if flags.contains(OutputFlags::MICROSECONDS) {
                // leap seconds report nanoseconds past 1e9
                let micros = (now.nanosecond() % 1_000_000_000) / 1_000;
                let _ = write!(out, ".{:06}", micros);
            }
            out.push_str("] ");
        }
        if !request_id.is_empty() {
            out.push('[');
            out.push_str(request_id);
            out.push(']');
        }
        if flags.contains(OutputFlags::LEVEL) {
            out.push_str(level.tag());
        }
        if self.caller {
            if let Some(site) = site {
                self.write_caller(&mut out, site);
            }
        }
        out
    }

    fn write_caller(&self, out: &mut String, site: &CallSite) {
        let flags = self.flags;
        if flags.contains(OutputFlags::MODULE) {
            if let Some(module) = site.module() {
                out.push_str(module);
                out.push(':');
            }
        }
        let file = if flags.contains(OutputFlags::LONG_FILE)
            && !flags.contains(OutputFlags::SHORT_FILE)
        {
            site.file()
        } else {
            site.short_file()
        };
        let _ = write!(out, "{}:{} ", file, site.line());
    }

    /// Header plus message, newline-terminated.
    pub fn record(
        &self,
        now: &DateTime<Local>,
        level: LogLevel,
        request_id: &str,
        site: Option<&CallSite>,
        message: &str,
    ) -> Vec<u8> {
        let mut line = self.header(now, level, request_id, site);
        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }
        line.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 2)
            .single()
            .unwrap()
            + chrono::Duration::microseconds(4_321)
    }

    #[test]
    fn test_segment_order() {
        let config = HeaderConfig::new(
            "svc ",
            OutputFlags::DATE | OutputFlags::TIME | OutputFlags::LEVEL,
        );
        let record = config.record(&fixed_time(), LogLevel::Info, "", None, "ready");
        assert_eq!(
            String::from_utf8(record).unwrap(),
            "svc [2024-03-07 09:05:02] [INFO]ready\n"
        );
    }

    #[test]
    fn test_microseconds_and_request_id() {
        let config = HeaderConfig::new("", OutputFlags::STD | OutputFlags::LEVEL);
        let header = config.header(&fixed_time(), LogLevel::Warn, "req-7", None);
        assert_eq!(header, "[2024-03-07 09:05:02.004321] [req-7][WARN]");
    }

    #[test]
    fn test_no_flags_is_prefix_only() {
        let config = HeaderConfig::new("p> ", OutputFlags::empty());
        let header = config.header(&fixed_time(), LogLevel::Error, "", None);
        assert_eq!(header, "p> ");
    }

    #[test]
    fn test_single_trailing_newline() {
        let config = HeaderConfig::new("", OutputFlags::empty());
        let now = fixed_time();
        assert_eq!(config.record(&now, LogLevel::Info, "", None, "a\n"), b"a\n");
        assert_eq!(config.record(&now, LogLevel::Info, "", None, "a"), b"a\n");
        assert_eq!(config.record(&now, LogLevel::Info, "", None, ""), b"\n");
    }

    #[test]
    fn test_caller_segment() {
        let site = CallSite::new("app::server", "src/server/listen.rs", 42);
        let mut config = HeaderConfig::new("", OutputFlags::LEVEL | OutputFlags::SHORT_FILE);
        config.caller = true;
        let header = config.header(&fixed_time(), LogLevel::Debug, "", Some(&site));
        assert_eq!(header, "[DEBUG]listen.rs:42 ");

        config.flags = OutputFlags::MODULE | OutputFlags::LONG_FILE;
        let header = config.header(&fixed_time(), LogLevel::Debug, "", Some(&site));
        assert_eq!(header, "app::server:src/server/listen.rs:42 ");

        config.caller = false;
        let header = config.header(&fixed_time(), LogLevel::Debug, "", Some(&site));
        assert_eq!(header, "");
    }

    #[test]
    fn test_track_caller_site() {
        let site = CallSite::caller();
        assert!(site.file().ends_with("header.rs"));
        assert_eq!(site.module(), None);
        assert!(site.line() > 0);
    }
}
