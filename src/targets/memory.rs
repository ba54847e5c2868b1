//! In-memory target and writer
//!
//! [`MemoryTarget`] records every entry it receives and counts its lifecycle
//! calls; [`SharedBuffer`] is a cloneable `Write` sink. Both are handy for
//! embedding the pipeline somewhere that inspects its own output, and for
//! tests.

use crate::core::{Dispatch, Entry, ErrorSink, LoggerError, Result, Target};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct Recorded {
    entries: Vec<Arc<Entry>>,
    opens: usize,
    drains: usize,
    closes: usize,
}

/// Target that keeps every delivered entry
///
/// Clones share the same recording, so keep one clone and hand the other to
/// the logger.
#[derive(Debug, Clone)]
pub struct MemoryTarget {
    name: String,
    fail_open: Option<String>,
    delay: Option<Duration>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_open: None,
            delay: None,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// A target whose `open` always fails with `message`
    pub fn failing_open(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fail_open: Some(message.into()),
            ..Self::named(name)
        }
    }

    /// Sleep for `delay` on every entry, simulating a slow destination
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.recorded.lock().entries.clone()
    }

    /// Formatted messages, in delivery order
    pub fn lines(&self) -> Vec<String> {
        self.recorded
            .lock()
            .entries
            .iter()
            .map(|e| e.formatted_message.clone())
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.recorded.lock().opens
    }

    pub fn drain_count(&self) -> usize {
        self.recorded.lock().drains
    }

    pub fn close_count(&self) -> usize {
        self.recorded.lock().closes
    }
}

impl Default for MemoryTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for MemoryTarget {
    fn open(&mut self, _errors: &ErrorSink) -> Result<()> {
        if let Some(ref message) = self.fail_open {
            return Err(LoggerError::target_open(&self.name, message.as_str()));
        }
        self.recorded.lock().opens += 1;
        Ok(())
    }

    fn process(&mut self, dispatch: &Dispatch) -> Result<()> {
        match dispatch {
            Dispatch::Entry(entry) => {
                if let Some(delay) = self.delay {
                    thread::sleep(delay);
                }
                self.recorded.lock().entries.push(Arc::clone(entry));
            }
            Dispatch::Drain => self.recorded.lock().drains += 1,
        }
        Ok(())
    }

    fn close(&mut self) {
        self.recorded.lock().closes += 1;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Cloneable in-memory writer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
