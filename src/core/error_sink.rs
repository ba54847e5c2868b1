//! Destination for the pipeline's own failures
//!
//! Logging must never fail the application path, so target open failures,
//! delivery failures and worker panics are written here as single lines
//! instead of being returned to the caller.

use super::error::LoggerError;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Prefix of every line written to an [`ErrorSink`]
pub const ERROR_PREFIX: &str = "[LOGKIT ERROR]";

/// Cloneable, thread-safe writer for internal errors
#[derive(Clone)]
pub struct ErrorSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    reported: Arc<AtomicU64>,
}

impl ErrorSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            reported: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one `[LOGKIT ERROR] ...` line
    pub fn report(&self, error: &LoggerError) {
        self.reported.fetch_add(1, Ordering::Relaxed);
        let mut writer = self.writer.lock();
        // Nowhere left to report a failing error sink.
        let _ = writeln!(writer, "{} {}", ERROR_PREFIX, error);
        let _ = writer.flush();
    }

    /// Number of errors reported through this sink (and its clones)
    pub fn reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink")
            .field("reported", &self.reported())
            .finish_non_exhaustive()
    }
}
