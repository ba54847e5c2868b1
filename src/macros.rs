//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Arguments are only
//! formatted when the entry passes the logger's threshold.
//!
//! # Examples
//!
//! ```
//! use rust_logkit::prelude::*;
//! use rust_logkit::info;
//!
//! let logger = Logger::builder().target(MemoryTarget::new()).build();
//! logger.open().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! logger.close();
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_fmt($severity, format_args!($($arg)+))
    };
}

/// Log an emergency-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::emergency;
/// emergency!(logger, "Database unreachable, shutting down");
/// ```
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Emergency, $($arg)+)
    };
}

/// Log an alert-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::alert;
/// alert!(logger, "Replica {} lost quorum", 3);
/// ```
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Alert, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::critical;
/// critical!(logger, "Disk {} failing", "/dev/sda");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::error;
/// error!(logger, "Request failed with status {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log a notice-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::notice;
/// notice!(logger, "Configuration reloaded");
/// ```
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Notice, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_logkit::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_logkit::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}
