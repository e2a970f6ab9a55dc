//! Logging facilities for Trailmark.
//!
//! This module provides:
//! - Target constants for filtering `tracing` output per subsystem
//! - [`LogManager`], an injected dispatcher that fans log messages out to a
//!   set of [`Logger`] sinks and can be switched on and off at runtime
//! - Two sinks: [`TracingLogger`] and [`FileLogger`]
//!
//! # Tracing Integration
//!
//! Library code logs through `tracing`. Install a subscriber in the
//! application to see it:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! # Log Manager
//!
//! The manager is owned by the application context and handed to the parts
//! of the application that report user-facing log messages:
//!
//! ```
//! use std::sync::Arc;
//! use trailmark_core::logging::{LogManager, TracingLogger};
//! use trailmark_core::trail_info;
//!
//! let manager = LogManager::new("Trailmark", "0.1.0");
//! manager.add_logger(Arc::new(TracingLogger::new()));
//! manager.set_logging_enabled(true);
//!
//! trail_info!(manager, "indexed {} files", 42);
//! ```

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::ops::BitOr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::{Mutex, RwLock};

use crate::error::{CoreError, Result};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core services target.
    pub const CORE: &str = "trailmark_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "trailmark_core::signal";
    /// Messages forwarded from the [`LogManager`](super::LogManager).
    pub const APPLICATION: &str = "trailmark::application";
    /// Stylesheet template resolution target.
    pub const TEMPLATE: &str = "trailmark_style::template";
    /// Color scheme target.
    pub const COLOR_SCHEME: &str = "trailmark_style::color_scheme";
    /// Settings persistence target.
    pub const SETTINGS: &str = "trailmark::settings";
    /// Font loading target.
    pub const FONTS: &str = "trailmark::fonts";
    /// Path detection target.
    pub const PATH_DETECTOR: &str = "trailmark::path_detector";
    /// Bundled resources and user data target.
    pub const RESOURCES: &str = "trailmark::resources";
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Informational message.
    Info,
    /// Something unexpected that the application recovered from.
    Warning,
    /// A failed operation.
    Error,
}

impl LogLevel {
    /// Uppercase name used in formatted log lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    const fn bit(&self) -> u8 {
        match self {
            Self::Info => LogLevelMask::INFO.0,
            Self::Warning => LogLevelMask::WARNING.0,
            Self::Error => LogLevelMask::ERROR.0,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(CoreError::InvalidLogLevel(s.to_string())),
        }
    }
}

/// A set of log levels a logger accepts.
///
/// Stored in settings as a plain integer (`bits`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogLevelMask(u8);

impl LogLevelMask {
    /// Accepts nothing.
    pub const NONE: Self = Self(0);
    /// Info messages.
    pub const INFO: Self = Self(1);
    /// Warnings.
    pub const WARNING: Self = Self(2);
    /// Errors.
    pub const ERROR: Self = Self(4);
    /// Every level.
    pub const ALL: Self = Self(7);

    /// Build a mask from its integer representation. Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Integer representation.
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Whether `level` passes this mask.
    pub const fn accepts(&self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }
}

impl Default for LogLevelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LogLevelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Where a log call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLocation {
    /// Source file.
    pub file: &'static str,
    /// Enclosing module path (the closest stable stand-in for a function name).
    pub function: &'static str,
    /// Line number.
    pub line: u32,
}

impl LogLocation {
    /// Create a location.
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// A location for messages that do not come from a call site.
    pub const fn unknown() -> Self {
        Self::new("", "", 0)
    }
}

/// A single dispatched log message.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// Severity.
    pub level: LogLevel,
    /// Message text.
    pub message: String,
    /// Call site.
    pub location: LogLocation,
    /// Local wall-clock time of the call.
    pub timestamp: DateTime<Local>,
    /// Name (or id) of the emitting thread.
    pub thread: String,
}

impl LogMessage {
    /// Create a message stamped with the current time and thread.
    pub fn new(level: LogLevel, message: impl Into<String>, location: LogLocation) -> Self {
        let current = std::thread::current();
        let thread = match current.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", current.id()),
        };

        Self {
            level,
            message: message.into(),
            location,
            timestamp: Local::now(),
            thread,
        }
    }

    /// File name of the call site without its directories.
    pub fn file_name(&self) -> &str {
        self.location
            .file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.location.file)
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.thread
        )?;
        if self.location.line != 0 {
            write!(
                f,
                " | {}:{} {}",
                self.file_name(),
                self.location.line,
                self.location.function
            )?;
        }
        write!(f, " | {}", self.message)
    }
}

/// A sink for log messages.
pub trait Logger: Send + Sync {
    /// A name shared by all loggers of the same kind, used for bulk removal.
    fn logger_type(&self) -> &str;

    /// Levels this logger wants to receive.
    fn level_mask(&self) -> LogLevelMask {
        LogLevelMask::ALL
    }

    /// Handle one message.
    fn log(&self, message: &LogMessage);
}

/// Dispatches log messages to registered loggers.
///
/// Logging starts disabled; messages logged while disabled are dropped.
pub struct LogManager {
    app_name: String,
    version: String,
    enabled: AtomicBool,
    loggers: RwLock<Vec<Arc<dyn Logger>>>,
}

impl LogManager {
    /// Create a manager for an application name and version.
    pub fn new(app_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            version: version.into(),
            enabled: AtomicBool::new(false),
            loggers: RwLock::new(Vec::new()),
        }
    }

    /// Switch logging on or off.
    ///
    /// Switching it on logs which application version is running.
    pub fn set_logging_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if enabled {
            crate::trail_info!(self, "Enabled logging for {} {}", self.app_name, self.version);
        }
    }

    /// Whether messages are currently dispatched.
    pub fn is_logging_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Register a logger.
    pub fn add_logger(&self, logger: Arc<dyn Logger>) {
        self.loggers.write().push(logger);
    }

    /// Remove a previously registered logger. Returns `false` if it was not registered.
    pub fn remove_logger(&self, logger: &Arc<dyn Logger>) -> bool {
        let mut loggers = self.loggers.write();
        let before = loggers.len();
        loggers.retain(|l| !Arc::ptr_eq(l, logger));
        loggers.len() != before
    }

    /// Remove every logger of the given type and return how many were removed.
    pub fn remove_loggers_by_type(&self, logger_type: &str) -> usize {
        let mut loggers = self.loggers.write();
        let before = loggers.len();
        loggers.retain(|l| l.logger_type() != logger_type);
        before - loggers.len()
    }

    /// Remove every logger.
    pub fn clear_loggers(&self) {
        self.loggers.write().clear();
    }

    /// Number of registered loggers.
    pub fn logger_count(&self) -> usize {
        self.loggers.read().len()
    }

    /// Log an informational message.
    pub fn log_info(&self, message: impl Into<String>, location: LogLocation) {
        self.log(LogLevel::Info, message, location);
    }

    /// Log a warning.
    pub fn log_warning(&self, message: impl Into<String>, location: LogLocation) {
        self.log(LogLevel::Warning, message, location);
    }

    /// Log an error.
    pub fn log_error(&self, message: impl Into<String>, location: LogLocation) {
        self.log(LogLevel::Error, message, location);
    }

    /// Log a message at `level`.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, location: LogLocation) {
        if !self.is_logging_enabled() {
            return;
        }

        // Loggers run without the lock held so they may log or unregister.
        let loggers: Vec<Arc<dyn Logger>> = self.loggers.read().clone();
        if loggers.is_empty() {
            return;
        }

        let message = LogMessage::new(level, message, location);
        for logger in loggers {
            if logger.level_mask().accepts(level) {
                logger.log(&message);
            }
        }
    }
}

impl fmt::Debug for LogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogManager")
            .field("app_name", &self.app_name)
            .field("version", &self.version)
            .field("enabled", &self.is_logging_enabled())
            .field("logger_count", &self.logger_count())
            .finish()
    }
}

/// Forwards messages to `tracing` under the [`targets::APPLICATION`] target.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    mask: LogLevelMask,
}

impl TracingLogger {
    /// Logger type name.
    pub const TYPE: &'static str = "tracing";

    /// Create a logger accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the accepted levels.
    pub fn with_level_mask(mut self, mask: LogLevelMask) -> Self {
        self.mask = mask;
        self
    }
}

impl Logger for TracingLogger {
    fn logger_type(&self) -> &str {
        Self::TYPE
    }

    fn level_mask(&self) -> LogLevelMask {
        self.mask
    }

    fn log(&self, message: &LogMessage) {
        let file = message.file_name();
        let line = message.location.line;
        match message.level {
            LogLevel::Info => {
                tracing::info!(target: targets::APPLICATION, file, line, "{}", message.message)
            }
            LogLevel::Warning => {
                tracing::warn!(target: targets::APPLICATION, file, line, "{}", message.message)
            }
            LogLevel::Error => {
                tracing::error!(target: targets::APPLICATION, file, line, "{}", message.message)
            }
        }
    }
}

/// Appends formatted messages to a log file.
pub struct FileLogger {
    path: PathBuf,
    file: Mutex<File>,
    mask: LogLevelMask,
}

impl FileLogger {
    /// Logger type name.
    pub const TYPE: &'static str = "file";

    /// Open (or create) `path` for appending. Parent directories are created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CoreError::log_file(&path, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| CoreError::log_file(&path, e))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            mask: LogLevelMask::ALL,
        })
    }

    /// Create a log file named after the current time inside `dir`.
    pub fn in_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let name = format!("log_{}.txt", Local::now().format("%Y-%m-%d_%H-%M-%S"));
        Self::new(dir.as_ref().join(name))
    }

    /// Restrict the accepted levels.
    pub fn with_level_mask(mut self, mask: LogLevelMask) -> Self {
        self.mask = mask;
        self
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Logger for FileLogger {
    fn logger_type(&self) -> &str {
        Self::TYPE
    }

    fn level_mask(&self) -> LogLevelMask {
        self.mask
    }

    fn log(&self, message: &LogMessage) {
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "{message}") {
            tracing::warn!(target: targets::CORE, path = %self.path.display(), "failed to write log line: {}", e);
        }
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("path", &self.path)
            .field("mask", &self.mask)
            .finish()
    }
}

/// Capture the current call site as a [`LogLocation`].
#[macro_export]
macro_rules! log_location {
    () => {
        $crate::logging::LogLocation::new(file!(), module_path!(), line!())
    };
}

/// Log an info message through a [`LogManager`](crate::logging::LogManager).
#[macro_export]
macro_rules! trail_info {
    ($manager:expr, $($arg:tt)*) => {
        $manager.log_info(format!($($arg)*), $crate::log_location!())
    };
}

/// Log a warning through a [`LogManager`](crate::logging::LogManager).
#[macro_export]
macro_rules! trail_warn {
    ($manager:expr, $($arg:tt)*) => {
        $manager.log_warning(format!($($arg)*), $crate::log_location!())
    };
}

/// Log an error through a [`LogManager`](crate::logging::LogManager).
#[macro_export]
macro_rules! trail_error {
    ($manager:expr, $($arg:tt)*) => {
        $manager.log_error(format!($($arg)*), $crate::log_location!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLogger {
        mask: Option<LogLevelMask>,
        messages: Mutex<Vec<LogMessage>>,
    }

    impl Logger for RecordingLogger {
        fn logger_type(&self) -> &str {
            "recording"
        }

        fn level_mask(&self) -> LogLevelMask {
            self.mask.unwrap_or_default()
        }

        fn log(&self, message: &LogMessage) {
            self.messages.lock().push(message.clone());
        }
    }

    fn recorder() -> Arc<RecordingLogger> {
        Arc::new(RecordingLogger::default())
    }

    #[test]
    fn disabled_manager_drops_messages() {
        let manager = LogManager::new("Trailmark", "1.0");
        let logger = recorder();
        manager.add_logger(logger.clone());

        trail_info!(manager, "dropped");
        assert!(logger.messages.lock().is_empty());
    }

    #[test]
    fn enabling_announces_version() {
        let manager = LogManager::new("Trailmark", "1.2.3");
        let logger = recorder();
        manager.add_logger(logger.clone());

        manager.set_logging_enabled(true);

        let messages = logger.messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, LogLevel::Info);
        assert_eq!(messages[0].message, "Enabled logging for Trailmark 1.2.3");
    }

    #[test]
    fn messages_carry_call_site() {
        let manager = LogManager::new("Trailmark", "1.0");
        let logger = recorder();
        manager.add_logger(logger.clone());
        manager.enabled.store(true, Ordering::SeqCst);

        trail_error!(manager, "failed with code {}", 3);

        let messages = logger.messages.lock();
        assert_eq!(messages[0].message, "failed with code 3");
        assert_eq!(messages[0].level, LogLevel::Error);
        assert_eq!(messages[0].file_name(), "logging.rs");
        assert!(messages[0].location.line > 0);
    }

    #[test]
    fn level_mask_filters() {
        let manager = LogManager::new("Trailmark", "1.0");
        let errors_only = Arc::new(RecordingLogger {
            mask: Some(LogLevelMask::ERROR),
            ..Default::default()
        });
        manager.add_logger(errors_only.clone());
        manager.enabled.store(true, Ordering::SeqCst);

        trail_info!(manager, "info");
        trail_warn!(manager, "warning");
        trail_error!(manager, "error");

        let messages = errors_only.messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "error");
    }

    #[test]
    fn logger_registry() {
        let manager = LogManager::new("Trailmark", "1.0");
        let first: Arc<dyn Logger> = recorder();
        let second: Arc<dyn Logger> = recorder();
        manager.add_logger(first.clone());
        manager.add_logger(second.clone());
        manager.add_logger(Arc::new(TracingLogger::new()));
        assert_eq!(manager.logger_count(), 3);

        assert!(manager.remove_logger(&first));
        assert!(!manager.remove_logger(&first));
        assert_eq!(manager.logger_count(), 2);

        assert_eq!(manager.remove_loggers_by_type("recording"), 1);
        assert_eq!(manager.logger_count(), 1);

        manager.clear_loggers();
        assert_eq!(manager.logger_count(), 0);
    }

    #[test]
    fn level_mask_bits() {
        let mask = LogLevelMask::INFO | LogLevelMask::ERROR;
        assert!(mask.accepts(LogLevel::Info));
        assert!(!mask.accepts(LogLevel::Warning));
        assert!(mask.accepts(LogLevel::Error));
        assert_eq!(LogLevelMask::from_bits(0xFF), LogLevelMask::ALL);
        assert_eq!(LogLevelMask::from_bits(mask.bits()), mask);
    }

    #[test]
    fn parse_level() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("ERROR".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn file_logger_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("trail.log");
        let logger = Arc::new(FileLogger::new(&path).unwrap());

        let manager = LogManager::new("Trailmark", "1.0");
        manager.add_logger(logger.clone());
        manager.set_logging_enabled(true);
        trail_warn!(manager, "disk almost full");

        let content = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[1].contains("WARNING"));
        assert!(lines[1].ends_with("disk almost full"));
    }

    #[test]
    fn message_display_without_location() {
        let message = LogMessage::new(LogLevel::Info, "plain", LogLocation::unknown());
        let line = message.to_string();
        assert!(line.contains("| INFO |"));
        assert!(line.ends_with("| plain"));
    }
}
