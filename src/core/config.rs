//! Scalar dispatcher options
//!
//! Targets, the error sink and formatters are code, not data; everything else
//! can be loaded from JSON:
//!
//! ```
//! use rust_logkit::{DispatcherConfig, Severity};
//!
//! let config = DispatcherConfig::from_json(
//!     r#"{ "buffer_size": 64, "max_severity": "Warning" }"#,
//! ).unwrap();
//! assert_eq!(config.buffer_size, 64);
//! assert_eq!(config.max_severity, Severity::Warning);
//! assert_eq!(config.call_stack_depth, 3);
//! ```

use super::error::Result;
use super::severity::Severity;
use serde::{Deserialize, Serialize};

/// Default capacity of the entry queue
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Default number of call-stack frames captured per entry
pub const DEFAULT_CALL_STACK_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Capacity of the entry queue; 0 makes every submit a rendezvous with the worker
    pub buffer_size: usize,
    /// Frames captured per entry; 0 disables capture
    pub call_stack_depth: usize,
    /// Only frames whose file path contains this substring are captured
    pub call_stack_filter: String,
    /// Entries less severe than this are dropped before formatting
    pub max_severity: Severity,
}

impl DispatcherConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            call_stack_depth: DEFAULT_CALL_STACK_DEPTH,
            call_stack_filter: String::new(),
            max_severity: Severity::Debug,
        }
    }
}
