//! Severity levels (RFC 5424)
//!
//! Lower values are more severe: `Emergency < Alert < ... < Debug`.

use super::error::LoggerError;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Emergency => "Emergency",
            Severity::Alert => "Alert",
            Severity::Critical => "Critical",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Notice => "Notice",
            Severity::Info => "Info",
            Severity::Debug => "Debug",
        }
    }

    /// Whether an entry of this severity passes a `max` threshold
    #[inline]
    pub fn is_within(&self, max: Severity) -> bool {
        *self <= max
    }

    /// Paint `text` with this severity's console color
    ///
    /// Debug keeps the terminal's default color. Whether escape codes are
    /// actually emitted is decided by `colored` (tty detection, `NO_COLOR`).
    pub fn colorize(&self, text: &str) -> ColoredString {
        match self {
            Severity::Emergency => text.bright_magenta().bold(),
            Severity::Alert => text.bright_red().bold(),
            Severity::Critical => text.magenta(),
            Severity::Error => text.red(),
            Severity::Warning => text.yellow(),
            Severity::Notice => text.cyan(),
            Severity::Info => text.green(),
            Severity::Debug => text.normal(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emergency" | "emerg" => Ok(Severity::Emergency),
            "alert" => Ok(Severity::Alert),
            "critical" | "crit" => Ok(Severity::Critical),
            "error" | "err" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "notice" => Ok(Severity::Notice),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(LoggerError::InvalidSeverity(s.to_string())),
        }
    }
}
