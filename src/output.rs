//! User-facing diagnostic lines.
//!
//! Every notice is a single stderr line: an emoji marker followed by the
//! message, colored by severity. Internal details go to `tracing` instead.

use colored::Colorize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    /// Emoji marker printed before the message.
    pub fn emoji(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }
}

/// Formats a notice line with its marker and color.
pub fn format_notice(level: Level, message: &str) -> String {
    let line = format!("{} {}", level.emoji(), message);
    match level {
        Level::Info => line.cyan().to_string(),
        Level::Success => line.green().to_string(),
        Level::Warning => line.yellow().to_string(),
        Level::Error => line.red().to_string(),
    }
}

/// Prints a notice to stderr.
pub fn notice(level: Level, message: &str) {
    eprintln!("{}", format_notice(level, message));
}
