//! Pipeline log stream.
//!
//! Every stage reports progress through the process-wide [`LOG_BROADCASTER`].
//! Info and success lines go to stdout, warnings and errors to stderr, and
//! every entry is also sent to whoever subscribed, so a run can be observed
//! from the outside.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// Entries kept for a slow subscriber before it starts lagging
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn marker(&self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "✓ ",
            Self::Warning => "⚠️ ",
            Self::Error => "❌ ",
        }
    }

    /// Warnings and errors
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth for sub-steps
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, indent: u8) -> Self {
        Self { level, message: message.into(), indent }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = usize::from(self.indent) + 1;
        write!(f, "{:width$}{}{}", "", self.level.marker(), self.message, width = depth * 3)
    }
}

pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn log(&self, entry: LogEntry) {
        if entry.level.is_problem() {
            eprintln!("{}", entry);
        } else {
            println!("{}", entry);
        }
        // Err only means nobody is subscribed
        let _ = self.sender.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Info, msg, 0));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Success, msg, 0));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Warning, msg, 0));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Error, msg, 0));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Info, msg, indent));
}

pub fn log_warning_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Warning, msg, indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_receives_entries() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::new(LogLevel::Warning, "area code table is empty", 1));

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "area code table is empty");
        assert_eq!(entry.indent, 1);
    }

    #[test]
    fn test_log_without_subscribers_does_not_panic() {
        let broadcaster = LogBroadcaster::new();
        broadcaster.log(LogEntry::new(LogLevel::Info, "nobody listening", 0));
    }

    #[test]
    fn test_display_indent_and_marker() {
        assert_eq!(LogEntry::new(LogLevel::Info, "GET x", 0).to_string(), "   GET x");
        assert_eq!(LogEntry::new(LogLevel::Success, "Saved", 1).to_string(), "      ✓ Saved");
        assert!(LogLevel::Error.is_problem());
        assert!(!LogLevel::Success.is_problem());
    }

    #[test]
    fn test_entry_serializes_lowercase_level() {
        let json = serde_json::to_value(LogEntry::new(LogLevel::Success, "done", 0)).unwrap();
        assert_eq!(json["level"], "success");
        assert_eq!(json["indent"], 0);
    }
}
