use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Represents the severity level of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Indicates a critical error that prevents the application from continuing.
    Fatal,
    /// Indicates a significant error that affects functionality but may allow continuation.
    Error,
    /// Indicates a potential issue or unexpected situation.
    Warn,
    /// Indicates informational messages about the application's state or progress.
    Info,
    /// Indicates detailed messages useful for debugging.
    Debug,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Fatal | Severity::Error)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Fatal => write!(f, "[FATAL]"),
            Severity::Error => write!(f, "[ERROR]"),
            Severity::Warn => write!(f, "[WARN]"),
            Severity::Info => write!(f, "[INFO]"),
            Severity::Debug => write!(f, "[DEBUG]"),
        }
    }
}

/// A log line with its severity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: Severity,
    pub msg: String,
}

impl Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level, self.msg)
    }
}

impl LogMessage {
    pub fn new(level: Severity, msg: String) -> Self {
        LogMessage { level, msg }
    }
}
