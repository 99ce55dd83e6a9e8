//! Leveled stderr logging shared by the IoP crates.
//!
//! Lines are written as plain text or one JSON object per line. A bounded
//! in-memory buffer can capture records for tools and tests that want to
//! inspect what was logged.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;

pub const LEVEL_ENV: &str = "IOP_LOG";
pub const FORMAT_ENV: &str = "IOP_LOG_FORMAT";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Level {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Error,
            2 => Self::Warn,
            4 => Self::Debug,
            5 => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Text = 0,
    Json = 1,
}

impl Format {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn from_u8(raw: u8) -> Self {
        if raw == Self::Json as u8 {
            Self::Json
        } else {
            Self::Text
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogConfig {
    pub level: Level,
    pub format: Format,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Text,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Reads `IOP_LOG` and `IOP_LOG_FORMAT`; unset or unparsable values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = lookup(LEVEL_ENV).as_deref().and_then(Level::parse) {
            config.level = level;
        }
        if let Some(format) = lookup(FORMAT_ENV).as_deref().and_then(Format::parse) {
            config.format = format;
        }
        config
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static FORMAT: AtomicU8 = AtomicU8::new(Format::Text as u8);
static TIMESTAMPS: AtomicBool = AtomicBool::new(true);
static STDERR_ENABLED: AtomicBool = AtomicBool::new(true);

static CAPTURE_ENABLED: AtomicBool = AtomicBool::new(false);
static CAPTURE_CAPACITY: AtomicUsize = AtomicUsize::new(0);
static CAPTURE: OnceLock<Mutex<VecDeque<Record>>> = OnceLock::new();

/// One emitted log line, as kept by the capture buffer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub ts_ms: u64,
    pub level: Level,
    pub target: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub msg: String,
}

impl Record {
    pub fn to_text(&self, timestamps: bool) -> String {
        let mut out = String::new();
        if timestamps {
            out.push_str(&Timestamp::from_millis(self.ts_ms).to_string());
            out.push(' ');
        }
        out.push_str(&format!("{} {}: {}", self.level, self.target, self.msg));
        out
    }

    pub fn to_json(&self) -> String {
        json!({
            "ts_ms": self.ts_ms,
            "level": self.level.as_str(),
            "target": self.target,
            "file": self.file,
            "line": self.line,
            "msg": self.msg,
        })
        .to_string()
    }
}

pub fn init(config: LogConfig) {
    LEVEL.store(config.level as u8, Ordering::Relaxed);
    FORMAT.store(config.format as u8, Ordering::Relaxed);
    TIMESTAMPS.store(config.timestamps, Ordering::Relaxed);
}

pub fn current_config() -> LogConfig {
    LogConfig {
        level: Level::from_u8(LEVEL.load(Ordering::Relaxed)),
        format: Format::from_u8(FORMAT.load(Ordering::Relaxed)),
        timestamps: TIMESTAMPS.load(Ordering::Relaxed),
    }
}

pub fn set_stderr_enabled(enabled: bool) {
    STDERR_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn enable_capture(capacity: usize) {
    if capacity == 0 {
        disable_capture();
        return;
    }
    CAPTURE_CAPACITY.store(capacity, Ordering::Relaxed);
    CAPTURE.get_or_init(|| Mutex::new(VecDeque::with_capacity(capacity.min(1024))));
    CAPTURE_ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable_capture() {
    CAPTURE_ENABLED.store(false, Ordering::Relaxed);
}

pub fn clear_captured() {
    if let Some(Ok(mut buf)) = CAPTURE.get().map(Mutex::lock) {
        buf.clear();
    }
}

/// Returns up to `limit` of the most recent captured records, oldest first.
pub fn captured(limit: usize) -> Vec<Record> {
    let Some(Ok(buf)) = CAPTURE.get().map(Mutex::lock) else {
        return Vec::new();
    };
    let skip = buf.len().saturating_sub(limit);
    buf.iter().skip(skip).cloned().collect()
}

pub fn enabled(level: Level) -> bool {
    level as u8 <= LEVEL.load(Ordering::Relaxed)
}

pub fn log(
    level: Level,
    target: &'static str,
    file: &'static str,
    line: u32,
    args: fmt::Arguments<'_>,
) {
    if !enabled(level) {
        return;
    }
    let to_stderr = STDERR_ENABLED.load(Ordering::Relaxed);
    let capture = CAPTURE_ENABLED.load(Ordering::Relaxed);
    if !to_stderr && !capture {
        return;
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO);
    let record = Record {
        ts_ms: now.as_millis().try_into().unwrap_or(u64::MAX),
        level,
        target,
        file,
        line,
        msg: args.to_string(),
    };

    if to_stderr {
        let rendered = match Format::from_u8(FORMAT.load(Ordering::Relaxed)) {
            Format::Text => record.to_text(TIMESTAMPS.load(Ordering::Relaxed)),
            Format::Json => record.to_json(),
        };
        let _ = writeln!(io::stderr().lock(), "{rendered}");
    }

    if capture {
        push_captured(record);
    }
}

fn push_captured(record: Record) {
    let cap = CAPTURE_CAPACITY.load(Ordering::Relaxed);
    let Some(Ok(mut buf)) = CAPTURE.get().map(Mutex::lock) else {
        return;
    };
    buf.push_back(record);
    while buf.len() > cap {
        buf.pop_front();
    }
}

#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)*) => {{
        if $crate::enabled($level) {
            $crate::log($level, module_path!(), file!(), line!(), format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::log_at!($crate::Level::Error, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::log_at!($crate::Level::Warn, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::log_at!($crate::Level::Info, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::log_at!($crate::Level::Debug, $($arg)*);
    }};
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        $crate::log_at!($crate::Level::Trace, $($arg)*);
    }};
}

/// UTC wall-clock time rendered as RFC 3339 with milliseconds.
struct Timestamp {
    secs: u64,
    millis: u64,
}

impl Timestamp {
    fn from_millis(ts_ms: u64) -> Self {
        Self {
            secs: ts_ms / 1000,
            millis: ts_ms % 1000,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = (self.secs / 86_400) as i64;
        let rem = self.secs % 86_400;
        let (year, month, day) = date_from_days(days);
        write!(
            f,
            "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{:03}Z",
            rem / 3600,
            (rem % 3600) / 60,
            rem % 60,
            self.millis
        )
    }
}

// Proleptic Gregorian date for a day count since 1970-01-01 (Hinnant's civil_from_days).
fn date_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = i64::from(yoe) + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(msg: &str) -> Record {
        Record {
            ts_ms: 1_463_452_181_250,
            level: Level::Warn,
            target: "iop_versionbits::state",
            file: "state.rs",
            line: 42,
            msg: msg.to_string(),
        }
    }

    #[test]
    fn parse_level() {
        assert_eq!(Level::parse("info"), Some(Level::Info));
        assert_eq!(Level::parse("WARN"), Some(Level::Warn));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse(" trace "), Some(Level::Trace));
        assert_eq!(Level::parse("nope"), None);
        assert!(Level::Error < Level::Debug);
    }

    #[test]
    fn parse_format() {
        assert_eq!(Format::parse("text"), Some(Format::Text));
        assert_eq!(Format::parse("JSON"), Some(Format::Json));
        assert_eq!(Format::parse("yaml"), None);
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let config = LogConfig::from_lookup(|key| match key {
            LEVEL_ENV => Some("debug".to_string()),
            FORMAT_ENV => Some("json".to_string()),
            _ => None,
        });
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.format, Format::Json);
        assert!(config.timestamps);

        let fallback = LogConfig::from_lookup(|_| Some("bogus".to_string()));
        assert_eq!(fallback, LogConfig::default());
    }

    #[test]
    fn text_line_layout() {
        let rec = record("bit 4 claimed twice");
        assert_eq!(
            rec.to_text(false),
            "WARN iop_versionbits::state: bit 4 claimed twice"
        );
        assert_eq!(
            rec.to_text(true),
            "2016-05-17T02:29:41.250Z WARN iop_versionbits::state: bit 4 claimed twice"
        );
    }

    #[test]
    fn json_line_fields() {
        let value: serde_json::Value =
            serde_json::from_str(&record("hello \"world\"").to_json()).expect("json");
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["line"], 42);
        assert_eq!(value["msg"], "hello \"world\"");
        assert_eq!(value["ts_ms"], 1_463_452_181_250u64);
    }

    #[test]
    fn epoch_dates() {
        assert_eq!(date_from_days(0), (1970, 1, 1));
        assert_eq!(date_from_days(11_016), (2000, 2, 29));
        assert_eq!(date_from_days(-1), (1969, 12, 31));
    }
}
