//! Logger handles
//!
//! A [`Logger`] is a cheap, cloneable facade over a shared [`Dispatcher`]:
//! it carries a category and a formatter and turns `log` calls into entries.
//! Any number of handles, with different categories and formatters, can feed
//! the same dispatcher and therefore the same targets.

use super::{
    call_stack,
    config::DispatcherConfig,
    dispatcher::Dispatcher,
    entry::Entry,
    error::Result,
    error_sink::ErrorSink,
    formatter::{default_formatter, Formatter},
    metrics::LoggerMetrics,
    severity::Severity,
    target::Target,
};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Category used when none is configured
pub const DEFAULT_CATEGORY: &str = "app";

/// Frames of this module are never part of a captured call stack
const LOGGER_MODULE: &str = module_path!();

#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    category: String,
    formatter: Formatter,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_logkit::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .max_severity(Severity::Info)
    ///     .buffer_size(256)
    ///     .target(ConsoleTarget::new())
    ///     .build();
    ///
    /// logger.open().unwrap();
    /// logger.info("service started");
    /// logger.close();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Attach a handle to an existing dispatcher
    pub fn from_dispatcher(
        dispatcher: Arc<Dispatcher>,
        category: impl Into<String>,
        formatter: Formatter,
    ) -> Self {
        Self {
            dispatcher,
            category: category.into(),
            formatter,
        }
    }

    /// New handle on the same dispatcher with its own category and formatter
    #[must_use]
    pub fn with_category(&self, category: impl Into<String>, formatter: Formatter) -> Self {
        Self::from_dispatcher(Arc::clone(&self.dispatcher), category, formatter)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    /// Open the shared dispatcher; see [`Dispatcher::open`]
    pub fn open(&self) -> Result<()> {
        self.dispatcher.open()
    }

    /// Close the shared dispatcher; see [`Dispatcher::close`]
    pub fn close(&self) {
        self.dispatcher.close()
    }

    pub fn is_open(&self) -> bool {
        self.dispatcher.is_open()
    }

    /// Build, format and submit an entry
    ///
    /// Entries less severe than the threshold are dropped before any
    /// formatting work; entries logged while closed are discarded. Never
    /// fails, but blocks while the dispatcher's queue is full.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        if self.admits(severity) {
            self.submit(severity, message.into());
        }
    }

    /// Like [`log`](Self::log), but `args` is only rendered once the entry
    /// is known to pass the threshold; used by the format macros
    pub fn log_fmt(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if self.admits(severity) {
            self.submit(severity, fmt::format(args));
        }
    }

    /// Threshold and open-state check, recording why an entry was turned away
    fn admits(&self, severity: Severity) -> bool {
        let dispatcher = &self.dispatcher;
        if !dispatcher.accepts(severity) {
            dispatcher.metrics().record_filtered();
            return false;
        }
        if !dispatcher.is_open() {
            dispatcher.metrics().record_discarded();
            return false;
        }
        true
    }

    fn submit(&self, severity: Severity, message: String) {
        let dispatcher = &self.dispatcher;
        let mut entry = Entry::new(severity, self.category.as_str(), message);
        let config = dispatcher.config();
        if config.call_stack_depth > 0 {
            entry = entry.with_call_stack(call_stack::capture_outside(
                LOGGER_MODULE,
                config.call_stack_depth,
                &config.call_stack_filter,
            ));
        }

        let formatted = (self.formatter)(self, &entry);
        dispatcher.submit(entry.with_formatted_message(formatted));
    }

    /// System is unusable
    #[inline]
    pub fn emergency(&self, message: impl Into<String>) {
        self.log(Severity::Emergency, message);
    }

    /// Action must be taken immediately
    #[inline]
    pub fn alert(&self, message: impl Into<String>) {
        self.log(Severity::Alert, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    /// Normal but significant condition
    #[inline]
    pub fn notice(&self, message: impl Into<String>) {
        self.log(Severity::Notice, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Logger`] and the [`Dispatcher`] behind it
///
/// The dispatcher is created closed; call [`Logger::open`] before logging.
pub struct LoggerBuilder {
    config: DispatcherConfig,
    error_sink: Option<ErrorSink>,
    targets: Vec<Box<dyn Target>>,
    category: String,
    formatter: Formatter,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            error_sink: Some(ErrorSink::stderr()),
            targets: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            formatter: Arc::new(default_formatter),
        }
    }

    /// Replace all scalar options at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Capacity of the entry queue
    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Frames captured per entry; 0 disables capture
    #[must_use = "builder methods return a new value"]
    pub fn call_stack_depth(mut self, depth: usize) -> Self {
        self.config.call_stack_depth = depth;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_stack_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.call_stack_filter = filter.into();
        self
    }

    /// Least severe level that is still logged
    #[must_use = "builder methods return a new value"]
    pub fn max_severity(mut self, severity: Severity) -> Self {
        self.config.max_severity = severity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Send internal errors to `writer` instead of stderr
    #[must_use = "builder methods return a new value"]
    pub fn error_writer(self, writer: impl Write + Send + 'static) -> Self {
        self.error_sink(ErrorSink::new(writer))
    }

    /// Remove the error sink; opening the dispatcher will then fail
    #[must_use = "builder methods return a new value"]
    pub fn without_error_sink(mut self) -> Self {
        self.error_sink = None;
        self
    }

    /// Add a target; targets receive entries in the order they were added
    #[must_use = "builder methods return a new value"]
    pub fn target<T: Target + 'static>(mut self, target: T) -> Self {
        self.targets.push(Box::new(target));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_target(mut self, target: Box<dyn Target>) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let dispatcher = Dispatcher::new(self.config, self.error_sink, self.targets);
        Logger::from_dispatcher(Arc::new(dispatcher), self.category, self.formatter)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::formatter;
    use crate::core::LoggerError;
    use crate::targets::{MemoryTarget, SharedBuffer};

    fn memory_logger(max: Severity) -> (Logger, MemoryTarget) {
        let memory = MemoryTarget::new();
        let logger = Logger::builder()
            .max_severity(max)
            .call_stack_depth(0)
            .error_writer(SharedBuffer::new())
            .target(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        assert_eq!(logger.category(), "app");
        assert_eq!(logger.dispatcher().config(), &DispatcherConfig::default());
        assert!(!logger.is_open());
    }

    #[test]
    fn test_threshold_filters_before_formatting() {
        let (logger, memory) = memory_logger(Severity::Warning);
        logger.open().unwrap();

        for severity in Severity::ALL {
            logger.log(severity, severity.as_str());
        }
        logger.close();

        let messages: Vec<String> = memory.entries().iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["Emergency", "Alert", "Critical", "Error", "Warning"]);
        assert_eq!(logger.metrics().filtered(), 3);
    }

    #[test]
    fn test_log_before_open_is_discarded() {
        let (logger, memory) = memory_logger(Severity::Debug);
        logger.error("too early");
        logger.open().unwrap();
        logger.close();

        assert!(memory.entries().is_empty());
        assert_eq!(logger.metrics().discarded(), 1);
    }

    #[test]
    fn test_per_severity_helpers() {
        let (logger, memory) = memory_logger(Severity::Debug);
        logger.open().unwrap();
        logger.emergency("a");
        logger.alert("b");
        logger.critical("c");
        logger.error("d");
        logger.warning("e");
        logger.notice("f");
        logger.info("g");
        logger.debug("h");
        logger.close();

        let severities: Vec<Severity> = memory.entries().iter().map(|e| e.severity).collect();
        assert_eq!(severities, Severity::ALL.to_vec());
    }

    #[test]
    fn test_categories_share_dispatcher() {
        let (logger, memory) = memory_logger(Severity::Debug);
        let audit = logger.with_category(
            "audit",
            formatter(|logger, entry| format!("[{}] {}", logger.category(), entry.message)),
        );
        assert!(Arc::ptr_eq(logger.dispatcher(), audit.dispatcher()));

        logger.open().unwrap();
        logger.info("from app");
        audit.info("from audit");
        logger.close();

        let lines = memory.lines();
        assert!(lines[0].ends_with("[Info][app] from app"));
        assert_eq!(lines[1], "[audit] from audit");
        assert_eq!(memory.entries()[1].category, "audit");
    }

    #[test]
    fn test_call_stack_capture_respects_depth() {
        let memory = MemoryTarget::new();
        let logger = Logger::builder()
            .call_stack_depth(2)
            .error_writer(SharedBuffer::new())
            .target(memory.clone())
            .build();

        logger.open().unwrap();
        logger.info("with stack");
        logger.close();

        let entry = &memory.entries()[0];
        let segments: Vec<&str> = entry.call_stack().split('\n').skip(1).collect();
        assert_eq!(segments.len(), 2, "stack: {:?}", entry.call_stack());
        // Every frame of this module, tests included, is stripped from the capture.
        assert!(segments.iter().all(|s| !s.contains("logger.rs")), "{:?}", segments);
        assert!(entry.formatted_message.ends_with(entry.call_stack()));
    }

    #[test]
    fn test_open_without_sink_is_config_error() {
        let logger = Logger::builder().without_error_sink().build();
        let err = logger.open().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
