//! Console target implementation

use crate::core::{Dispatch, ErrorSink, LoggerError, Result, Target};
use std::io::{self, Write};

/// Writes `formatted-message\n` to stdout (or any writer), colored by severity
///
/// Colors are dropped on Windows, when disabled with [`with_colors`], and
/// whenever `colored` decides the terminal can't show them.
///
/// [`with_colors`]: ConsoleTarget::with_colors
pub struct ConsoleTarget {
    use_colors: bool,
    writer: Box<dyn Write + Send>,
}

impl ConsoleTarget {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            writer: Box::new(io::stdout()),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Write to `writer` instead of stdout
    ///
    /// Turns colors off: whether `colored` emits escape codes is decided by
    /// the process's stdout, not by `writer`. Call [`with_colors`] afterwards
    /// to force them back on.
    ///
    /// [`with_colors`]: ConsoleTarget::with_colors
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logkit::targets::ConsoleTarget;
    ///
    /// let target = ConsoleTarget::new()
    ///     .with_writer(std::io::stderr());
    /// assert!(!target.uses_colors());
    /// ```
    #[must_use]
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Box::new(writer);
        self.use_colors = false;
        self
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }
}

impl Default for ConsoleTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Target for ConsoleTarget {
    fn open(&mut self, _errors: &ErrorSink) -> Result<()> {
        if cfg!(windows) {
            self.use_colors = false;
        }
        Ok(())
    }

    fn process(&mut self, dispatch: &Dispatch) -> Result<()> {
        let result = match dispatch {
            Dispatch::Entry(entry) => {
                if self.use_colors {
                    writeln!(
                        self.writer,
                        "{}",
                        entry.severity.colorize(&entry.formatted_message)
                    )
                } else {
                    writeln!(self.writer, "{}", entry.formatted_message)
                }
            }
            // Nothing buffered here beyond the stream itself.
            Dispatch::Drain => self.writer.flush(),
        };
        result.map_err(|e| LoggerError::delivery(self.name(), e.to_string()))
    }

    fn close(&mut self) {
        let _ = self.writer.flush();
    }

    fn name(&self) -> &str {
        "console"
    }
}
