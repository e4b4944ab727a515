//! Diagnostic tracing to a file.
//!
//! The terminal belongs to the UI, so tracing output goes to
//! `<log dir>/feedterm-trace.log`. Off unless `FEEDTERM_TRACE` or
//! `RUST_LOG` is set.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::error::LogIoError;

/// Enables tracing when set (any value).
pub const TRACE_ENV: &str = "FEEDTERM_TRACE";

const TRACE_FILE: &str = "feedterm-trace.log";

/// Install the global subscriber. Returns the trace file path when
/// tracing was enabled.
pub fn init_tracing(dir: &Path) -> Result<Option<PathBuf>, LogIoError> {
    let requested = std::env::var_os(TRACE_ENV).is_some() || std::env::var_os("RUST_LOG").is_some();
    if !requested {
        return Ok(None);
    }

    std::fs::create_dir_all(dir).map_err(|e| LogIoError::new("create_dir", dir, e))?;
    let path = dir.join(TRACE_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| LogIoError::new("open", &path, e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedterm=debug"));

    // A subscriber may already be installed (tests); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(Some(path))
}
