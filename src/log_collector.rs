//! Decoupled file logging for the console.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::warn!() / ...
//!     |
//! [LogCollector] (implements log::Log, never blocks the UI thread)
//!     | (crossbeam unbounded channel)
//!     v
//! [writer thread] -> logs/matrix-<date>.log
//! ```
//!
//! `wait_for_empty()` pushes a flush marker through the same channel and
//! blocks until the writer has handled everything sent before it.

use crate::error::AppError;
use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogLine {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        LogLine {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("[{}] [{:<5}] {}: {}\n", self.timestamp, self.level, self.target, self.message)
    }
}

/// Resolve the log directory: relative paths are taken from the working directory.
pub fn resolve_logs_path(log_dir: &str) -> Result<PathBuf, AppError> {
    let path = PathBuf::from(log_dir);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| AppError::Logging(format!("Failed to get current working directory: {}", e)))?;
    Ok(cwd.join(path))
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| AppError::Logging(format!("Failed to create logs directory: {}", e)))
}

/// Unified logger writing every record to today's log file
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    log_path: PathBuf,
    level: LevelFilter,
}

impl LogCollector {
    /// Create the collector and start its writer thread.
    pub fn new(log_dir: &Path, level: LevelFilter) -> Result<Self, AppError> {
        ensure_logs_dir_exists(log_dir)?;
        let log_path = log_dir.join(format!("matrix-{}.log", Local::now().format("%Y-%m-%d")));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| AppError::Logging(format!("Failed to open {}: {}", log_path.display(), e)))?;

        let (tx, rx) = unbounded::<LogMessage>();

        // Plain OS thread: blocking recv() drains the channel until every
        // sender is dropped.
        std::thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let _ = file.write_all(line.render().as_bytes());
                    }
                    LogMessage::Flush(done) => {
                        let _ = file.flush();
                        let _ = done.send(());
                    }
                }
            }
            let _ = file.flush();
        });

        Ok(LogCollector { tx, log_path, level })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Send a log line (non-blocking)
    pub fn push(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Block until every line sent before this call has reached the file.
    pub fn wait_for_empty(&self) -> Result<(), AppError> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| AppError::Logging(format!("Failed to send flush marker: {}", e)))?;
        rx.recv()
            .map_err(|e| AppError::Logging(format!("Flush signal interrupted: {}", e)))
    }

    /// Register a clone of this collector as the global `log` backend.
    pub fn install(&self) -> Result<(), AppError> {
        log::set_boxed_logger(Box::new(self.clone()))
            .map(|()| log::set_max_level(self.level))
            .map_err(|e| AppError::Logging(e.to_string()))
    }
}

/// Wires all log::info!(), log::warn!(), log::error!() calls into LogCollector
impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.push(LogLine::new(
                record.level(),
                record.target(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_reach_disk_after_flush() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path(), LevelFilter::Info).unwrap();
        collector.push(LogLine::new(Level::Info, "matrix", "expanded Aug'25"));
        collector.push(LogLine::new(Level::Warn, "dataset", "unknown id"));
        collector.wait_for_empty().unwrap();

        let content = std::fs::read_to_string(collector.log_path()).unwrap();
        assert!(content.contains("matrix: expanded Aug'25"));
        assert!(content.contains("[WARN ] dataset: unknown id"));
    }

    #[test]
    fn test_level_filter() {
        let temp_dir = TempDir::new().unwrap();
        let collector = LogCollector::new(temp_dir.path(), LevelFilter::Info).unwrap();
        let debug = Metadata::builder().level(Level::Debug).target("t").build();
        let error = Metadata::builder().level(Level::Error).target("t").build();
        assert!(!collector.enabled(&debug));
        assert!(collector.enabled(&error));
    }

    #[test]
    fn test_resolve_relative_logs_path() {
        let resolved = resolve_logs_path("logs").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
    }
}
