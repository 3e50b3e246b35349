//! Severity definitions and their terminal colors

use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ANSI escape that restores the terminal's default color
pub const COLOR_RESET: &str = "\x1b[0m";

/// Severity tag attached to every log line.
///
/// Severities carry no ordering: every severity is always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn color_code(&self) -> Color {
        match self {
            Severity::Debug => Color::Cyan,
            Severity::Info => Color::Blue,
            Severity::Warn => Color::Yellow,
            Severity::Error => Color::Red,
            Severity::Fatal => Color::Magenta,
        }
    }

    /// ANSI escape that switches the terminal to this severity's color
    pub fn color_escape(&self) -> String {
        escape_for(self.color_code())
    }
}

/// Color escape for a severity label, falling back to white for labels
/// that do not name a [`Severity`].
///
/// ```
/// use esl_logger::core::severity::color_for_label;
///
/// assert_eq!(color_for_label("WARN"), "\x1b[33m");
/// assert_eq!(color_for_label("NOTICE"), "\x1b[37m");
/// ```
pub fn color_for_label(label: &str) -> String {
    match label.parse::<Severity>() {
        Ok(severity) => severity.color_escape(),
        Err(_) => escape_for(Color::White),
    }
}

fn escape_for(color: Color) -> String {
    format!("\x1b[{}m", color.to_fg_str())
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" => Ok(Severity::Fatal),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
