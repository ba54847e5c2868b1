//! Core pipeline types and traits

pub mod call_stack;
pub mod config;
pub mod dispatcher;
pub mod entry;
pub mod error;
pub mod error_sink;
pub mod formatter;
pub mod logger;
pub mod metrics;
pub mod severity;
pub mod target;

pub use config::{DispatcherConfig, DEFAULT_BUFFER_SIZE, DEFAULT_CALL_STACK_DEPTH};
pub use dispatcher::Dispatcher;
pub use entry::{Dispatch, Entry};
pub use error::{LoggerError, Result};
pub use error_sink::ErrorSink;
pub use formatter::{default_formatter, formatter, json_formatter, Formatter};
pub use logger::{Logger, LoggerBuilder, DEFAULT_CATEGORY};
pub use metrics::LoggerMetrics;
pub use severity::Severity;
pub use target::Target;
