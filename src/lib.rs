//! # Rust Logkit
//!
//! An asynchronous logging pipeline with pluggable output targets.
//!
//! Producers on any thread call [`Logger::log`] (or one of the per-severity
//! helpers). Entries below the configured threshold are dropped immediately;
//! the rest are formatted on the calling thread and queued in a bounded
//! channel. A single worker thread delivers each entry, in order, to every
//! target that opened successfully.
//!
//! ## Features
//!
//! - **Severity filtering**: RFC 5424 levels, Emergency through Debug
//! - **Categories and formatters**: any number of [`Logger`] handles share one dispatcher
//! - **Targets**: console (colored), daily file, network (TCP/UDP/Unix), in-memory
//! - **Backpressure**: a full queue blocks producers instead of dropping entries
//! - **Clean shutdown**: `close` drains everything queued before returning

pub mod core;
pub mod macros;
pub mod targets;

pub mod prelude {
    pub use crate::core::{
        default_formatter, formatter, json_formatter, Dispatch, Dispatcher, DispatcherConfig,
        Entry, ErrorSink, Formatter, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result,
        Severity, Target,
    };
    pub use crate::targets::{ConsoleTarget, FileTarget, MemoryTarget, NetworkTarget, SharedBuffer};
}

pub use crate::core::{
    default_formatter, formatter, json_formatter, Dispatch, Dispatcher, DispatcherConfig, Entry,
    ErrorSink, Formatter, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, Severity,
    Target, DEFAULT_BUFFER_SIZE, DEFAULT_CALL_STACK_DEPTH, DEFAULT_CATEGORY,
};
pub use targets::{ConsoleTarget, FileTarget, MemoryTarget, NetworkTarget, SharedBuffer};
