//! File target implementation
//!
//! Entries go to `<directory>/<YYYYMMDD>.log`, named after the local date at
//! the moment the target was opened (no rotation while running). Writes are
//! buffered; a background thread flushes the buffer every
//! [`DEFAULT_FLUSH_INTERVAL`], and the drain performs a final flush so nothing
//! buffered is lost on shutdown.

use crate::core::{Dispatch, ErrorSink, LoggerError, Result, Target};
use chrono::Local;
use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How often buffered entries are flushed to disk
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(2);

type SharedWriter = Arc<Mutex<BufWriter<File>>>;

/// Periodic flush thread; dropping `stop` ends it
struct Flusher {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}

pub struct FileTarget {
    directory: PathBuf,
    flush_interval: Duration,
    path: Option<PathBuf>,
    writer: Option<SharedWriter>,
    flusher: Option<Flusher>,
    errors: Option<ErrorSink>,
}

impl FileTarget {
    /// Log into the system temporary directory
    pub fn new() -> Self {
        Self::in_directory(std::env::temp_dir())
    }

    /// Log into `directory`, created on open if missing
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            path: None,
            writer: None,
            flusher: None,
            errors: None,
        }
    }

    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the log file; `None` until opened
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Stop the flush thread, then flush whatever is still buffered
    fn finish(&mut self) -> Result<()> {
        if let Some(flusher) = self.flusher.take() {
            drop(flusher.stop);
            if flusher.handle.join().is_err() {
                return Err(LoggerError::delivery(self.name(), "flush thread panicked"));
            }
        }
        if let Some(ref writer) = self.writer {
            writer
                .lock()
                .flush()
                .map_err(|e| LoggerError::delivery(self.name(), format!("final flush failed: {}", e)))?;
        }
        Ok(())
    }
}

impl Default for FileTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for FileTarget {
    fn open(&mut self, errors: &ErrorSink) -> Result<()> {
        let directory = resolve_directory(&self.directory)
            .map_err(|e| LoggerError::target_open(self.name(), e.to_string()))?;
        let path = directory.join(format!("{}.log", Local::now().format("%Y%m%d")));

        let file = open_append(&path).map_err(|e| {
            LoggerError::target_open(
                self.name(),
                format!("unable to create log file '{}': {}", path.display(), e),
            )
        })?;
        let writer: SharedWriter = Arc::new(Mutex::new(BufWriter::new(file)));

        let flusher = spawn_flusher(Arc::clone(&writer), self.flush_interval, errors.clone())
            .map_err(|e| LoggerError::target_open(self.name(), format!("flush thread: {}", e)))?;

        self.path = Some(path);
        self.writer = Some(writer);
        self.flusher = Some(flusher);
        self.errors = Some(errors.clone());
        Ok(())
    }

    fn process(&mut self, dispatch: &Dispatch) -> Result<()> {
        match dispatch {
            Dispatch::Entry(entry) => {
                let writer = self
                    .writer
                    .as_ref()
                    .ok_or_else(|| LoggerError::delivery("file", "file target is not open"))?;
                let mut writer = writer.lock();
                writer
                    .write_all(entry.formatted_message.as_bytes())
                    .and_then(|()| writer.write_all(b"\n"))
                    .map_err(|e| LoggerError::delivery("file", e.to_string()))
            }
            Dispatch::Drain => self.finish(),
        }
    }

    fn close(&mut self) {
        // Only does work if the drain never arrived.
        if let Err(e) = self.finish() {
            if let Some(ref errors) = self.errors {
                errors.report(&e);
            }
        }
        self.writer = None;
        self.errors = None;
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileTarget {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Absolute form of `directory`, created if missing
fn resolve_directory(directory: &Path) -> Result<PathBuf> {
    let resolved = if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        std::env::current_dir()?.join(directory)
    };
    fs::create_dir_all(&resolved).map_err(|e| {
        LoggerError::io_operation(
            "creating log directory",
            format!("cannot create '{}'", resolved.display()),
            e,
        )
    })?;
    Ok(resolved)
}

fn open_append(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }
    options.open(path)
}

fn spawn_flusher(
    writer: SharedWriter,
    interval: Duration,
    errors: ErrorSink,
) -> std::io::Result<Flusher> {
    let (stop, stopped) = bounded::<()>(0);
    let handle = thread::Builder::new()
        .name("logkit-file-flush".to_string())
        .spawn(move || {
            let ticker = tick(interval);
            loop {
                select! {
                    recv(ticker) -> _ => {
                        if let Err(e) = writer.lock().flush() {
                            errors.report(&LoggerError::delivery("file", format!("periodic flush failed: {}", e)));
                        }
                    }
                    recv(stopped) -> _ => break,
                }
            }
        })?;
    Ok(Flusher { stop, handle })
}
