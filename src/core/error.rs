//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid dispatcher configuration; fatal to `open`
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A target could not be opened; the target is excluded from dispatch
    #[error("Failed to open target '{target}': {message}")]
    TargetOpen { target: String, message: String },

    /// A target failed to deliver an entry; the entry is dropped for that target
    #[error("Delivery to target '{target}' failed: {message}")]
    Delivery { target: String, message: String },

    /// Unknown severity name
    #[error("Invalid severity: '{0}'")]
    InvalidSeverity(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a target open error
    pub fn target_open(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TargetOpen {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(target: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Delivery {
            target: target.into(),
            message: message.into(),
        }
    }
}
