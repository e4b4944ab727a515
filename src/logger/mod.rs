//! Buffered, rotating JSON event log.
//!
//! Records are buffered in memory and flushed once the buffer reaches
//! `buffer_size`. A flush rewrites the whole live file so it is always a
//! valid JSON array. When a flush would push the file past `max_entries`,
//! the live file is renamed to `<base>-NNNN.json` first and the oldest
//! rotations beyond `max_rotation_files` are deleted.
//!
//! File errors never reach the caller. They go to the tracing side channel
//! (target `feedterm::logger`) and are counted in [`RotatingLogger::failures`].

mod record;
mod rotation;
mod tracing_setup;

pub use record::{category, LogRecord};
pub use rotation::{next_sequence, rotated_path, scan_rotations};
pub use tracing_setup::{init_tracing, TRACE_ENV};

use chrono::Local;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::LogConfig;
use crate::error::LogIoError;

/// Thread-safe event logger shared by the session and the UI loop.
///
/// # Example
///
/// ```ignore
/// let logger = Arc::new(RotatingLogger::new(&config.log));
/// logger.log(category::WEBSOCKET, "connected");
/// // ... at teardown, exactly once:
/// logger.close();
/// ```
pub struct RotatingLogger {
    enabled: AtomicBool,
    failures: AtomicUsize,
    state: Mutex<LoggerState>,
}

struct LoggerState {
    dir: PathBuf,
    base: String,
    buffer: Vec<LogRecord>,
    buffer_size: usize,
    max_entries: usize,
    max_rotation_files: usize,
    closed: bool,
}

impl RotatingLogger {
    /// Logger whose base name is `log-YYYYMMDD-HHMMSS` for the current time.
    pub fn new(config: &LogConfig) -> Self {
        let base = Local::now().format("log-%Y%m%d-%H%M%S").to_string();
        Self::with_base_name(config, base)
    }

    pub fn with_base_name(config: &LogConfig, base: impl Into<String>) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            failures: AtomicUsize::new(0),
            state: Mutex::new(LoggerState {
                dir: config.dir.clone(),
                base: base.into(),
                buffer: Vec::new(),
                buffer_size: config.buffer_size.max(1),
                max_entries: config.max_entries.max(1),
                max_rotation_files: config.max_rotation_files.max(1),
                closed: false,
            }),
        }
    }

    /// A logger that never touches the filesystem.
    pub fn disabled() -> Self {
        Self::with_base_name(
            &LogConfig::new(std::env::temp_dir()).with_enabled(false),
            "disabled",
        )
    }

    /// Append a record; flushes when the buffer is full.
    ///
    /// No-op while disabled or after [`close`](Self::close).
    pub fn log(&self, category: &str, message: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }
        let errors = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.buffer.push(LogRecord::now(category, message));
            if state.buffer.len() >= state.buffer_size {
                state.flush()
            } else {
                Vec::new()
            }
        };
        self.report(errors);
    }

    /// Write buffered records to the live file.
    pub fn flush(&self) {
        let errors = self.lock().flush();
        self.report(errors);
    }

    /// Append the closing marker and flush. Later calls are no-ops.
    pub fn close(&self) {
        let errors = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            if self.is_enabled() {
                state
                    .buffer
                    .push(LogRecord::now(category::SYSTEM, "logger closed"));
            }
            state.flush()
        };
        self.report(errors);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Path of the live log file.
    pub fn file_path(&self) -> PathBuf {
        self.lock().live_path()
    }

    pub fn base_name(&self) -> String {
        self.lock().base.clone()
    }

    /// Records waiting for the next flush.
    pub fn buffered(&self) -> usize {
        self.lock().buffer.len()
    }

    /// File operations that have failed so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, errors: Vec<LogIoError>) {
        for err in errors {
            self.failures.fetch_add(1, Ordering::SeqCst);
            tracing::error!(
                target: "feedterm::logger",
                operation = err.operation,
                path = %err.path.display(),
                "{}",
                err
            );
        }
    }
}

impl LoggerState {
    fn live_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.base))
    }

    /// Merge the buffer into the live file, rotating first if it would
    /// exceed `max_entries`. On failure the buffer is kept (capped) for
    /// the next attempt.
    fn flush(&mut self) -> Vec<LogIoError> {
        let mut errors = Vec::new();
        if self.buffer.is_empty() {
            return errors;
        }

        if let Err(e) = fs::create_dir_all(&self.dir) {
            errors.push(LogIoError::new("create_dir", &self.dir, e));
            self.cap_buffer();
            return errors;
        }

        let path = self.live_path();
        let mut records = match fs::read(&path) {
            Ok(data) if data.is_empty() => Vec::new(),
            Ok(data) => match serde_json::from_slice::<Vec<LogRecord>>(&data) {
                Ok(records) => records,
                Err(e) => {
                    // Corrupt file: start over rather than lose new records
                    errors.push(LogIoError::new("parse", &path, e));
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                errors.push(LogIoError::new("read", &path, e));
                self.cap_buffer();
                return errors;
            }
        };

        if records.len() + self.buffer.len() > self.max_entries && self.rotate(&path, &mut errors)
        {
            records = self.buffer.clone();
        } else {
            records.extend(self.buffer.iter().cloned());
        }

        let written = serde_json::to_vec_pretty(&records)
            .map_err(|e| LogIoError::new("serialize", &path, e))
            .and_then(|data| fs::write(&path, data).map_err(|e| LogIoError::new("write", &path, e)));
        match written {
            Ok(()) => self.buffer.clear(),
            Err(e) => {
                errors.push(e);
                self.cap_buffer();
            }
        }
        errors
    }

    /// Move the live file aside. Returns false if it could not be moved,
    /// in which case the caller appends to it as usual.
    fn rotate(&mut self, live: &Path, errors: &mut Vec<LogIoError>) -> bool {
        let existing = match scan_rotations(&self.dir, &self.base) {
            Ok(existing) => existing,
            Err(e) => {
                errors.push(e);
                return false;
            }
        };
        let Some(sequence) = next_sequence(&existing) else {
            errors.push(LogIoError::new(
                "rotate",
                live,
                format!("rotation sequence {} reached", rotation::MAX_SEQUENCE),
            ));
            return false;
        };
        errors.extend(rotation::prune_oldest(&existing, self.max_rotation_files));

        let target = rotated_path(&self.dir, &self.base, sequence);
        if live.exists() {
            if let Err(e) = fs::rename(live, &target) {
                errors.push(LogIoError::new("rename", live, e));
                return false;
            }
            self.buffer.push(LogRecord::now(
                category::SYSTEM,
                format!(
                    "rotated log file: {} -> {}",
                    live.display(),
                    target.display()
                ),
            ));
        }
        true
    }

    fn cap_buffer(&mut self) {
        if self.buffer.len() > self.max_entries {
            let excess = self.buffer.len() - self.max_entries;
            self.buffer.drain(..excess);
        }
    }
}
