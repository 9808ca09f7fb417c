//! Log sinks
//!
//! Process-wide sinks for the access/info, error and analytics streams.
//! Each stream writes to a file when configured, otherwise to stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use crate::config::{LogLevel, LoggingConfig};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(open_log_file(p)?)),
            None => Ok(fallback),
        }
    }

    fn write_line(&mut self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(f) => {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// One mutex-guarded target per stream
pub struct LogWriter {
    level: LogLevel,
    access: Mutex<LogTarget>,
    error: Mutex<LogTarget>,
    analytics: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(config: &LoggingConfig) -> io::Result<Self> {
        Ok(Self {
            level: config.level,
            access: Mutex::new(LogTarget::open(
                config.access_log_file.as_deref(),
                LogTarget::Stdout,
            )?),
            error: Mutex::new(LogTarget::open(
                config.error_log_file.as_deref(),
                LogTarget::Stderr,
            )?),
            analytics: Mutex::new(LogTarget::open(
                config.analytics_log_file.as_deref(),
                LogTarget::Stdout,
            )?),
        })
    }

    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Write info/access message
    pub fn write_info(&self, message: &str) {
        write_locked(&self.access, message);
    }

    pub fn write_error(&self, message: &str) {
        write_locked(&self.error, message);
    }

    pub fn write_analytics(&self, message: &str) {
        write_locked(&self.analytics, message);
    }
}

/// A poisoned lock only means another writer panicked mid-line; keep logging.
fn write_locked(target: &Mutex<LogTarget>, message: &str) {
    let mut guard = target
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    guard.write_line(message);
}

/// Open for append, creating the file and its parent directories
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the process-wide writer
///
/// Returns error if log files cannot be opened or the writer is already set.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let writer = LogWriter::new(config)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessLogFormat;

    fn logging_config(dir: &Path) -> LoggingConfig {
        LoggingConfig {
            level: LogLevel::Info,
            access_log: true,
            access_log_format: AccessLogFormat::Combined,
            access_log_file: Some(dir.join("access.log").to_string_lossy().into_owned()),
            error_log_file: Some(dir.join("nested/error.log").to_string_lossy().into_owned()),
            analytics_log_file: Some(dir.join("analytics.log").to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn test_file_targets_receive_their_stream() {
        let dir = std::env::temp_dir().join(format!("lugx-writer-{}", std::process::id()));
        let writer = LogWriter::new(&logging_config(&dir)).unwrap();

        writer.write_info("info line");
        writer.write_error("error line");
        writer.write_analytics("Analytics Event: click on /home at now");

        let access = std::fs::read_to_string(dir.join("access.log")).unwrap();
        let error = std::fs::read_to_string(dir.join("nested/error.log")).unwrap();
        let analytics = std::fs::read_to_string(dir.join("analytics.log")).unwrap();
        assert_eq!(access, "info line\n");
        assert_eq!(error, "error line\n");
        assert_eq!(analytics, "Analytics Event: click on /home at now\n");

        std::fs::remove_dir_all(&dir).ok();
    }
}
