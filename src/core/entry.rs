//! Log entry structure

use super::severity::Severity;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One log record
///
/// Built by a [`Logger`](super::Logger) and immutable once submitted: the
/// dispatcher wraps it in an `Arc` and every target only ever sees a shared
/// reference.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_stack: Option<String>,
    #[serde(skip)]
    pub formatted_message: String,
}

impl Entry {
    pub fn new(severity: Severity, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            timestamp: Local::now(),
            call_stack: None,
            formatted_message: String::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach captured call-stack text; an empty capture leaves the entry without one
    pub fn with_call_stack(mut self, call_stack: String) -> Self {
        self.call_stack = if call_stack.is_empty() { None } else { Some(call_stack) };
        self
    }

    pub fn with_formatted_message(mut self, formatted: String) -> Self {
        self.formatted_message = formatted;
        self
    }

    /// Call-stack text, or `""` when none was captured
    pub fn call_stack(&self) -> &str {
        self.call_stack.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_message)
    }
}

/// An item travelling from the dispatcher to its targets
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// A log entry to deliver
    Entry(Arc<Entry>),
    /// End of stream: flush, stop private workers and acknowledge
    Drain,
}

impl Dispatch {
    pub fn is_drain(&self) -> bool {
        matches!(self, Dispatch::Drain)
    }
}
