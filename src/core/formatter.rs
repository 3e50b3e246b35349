//! Line formatting
//!
//! Turns a timestamp, logger name, severity and message into one text line,
//! then wraps that line in the severity's ANSI color. Formatting is pure: the
//! caller supplies the timestamp, so the same inputs always give the same line.

use super::error::{LoggerError, Result};
use super::severity::{Severity, COLOR_RESET};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Placeholder marking one slot in a [`Template`]
pub const SLOT: &str = "{}";

/// Number of slots a template must expose: timestamp, name, severity, message
pub const SLOT_COUNT: usize = 4;

/// Line template with exactly four `{}` slots, filled in the order
/// timestamp, logger name, severity, message.
///
/// # Examples
///
/// ```
/// use esl_logger::core::formatter::Template;
///
/// let template: Template = "[{}] {} - {}: {}".parse().unwrap();
/// assert_eq!(template.as_str(), "[{}] {} - {}: {}");
///
/// assert!("{} {}".parse::<Template>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    source: String,
    /// Literal text around the slots; always `SLOT_COUNT + 1` entries
    segments: Vec<String>,
}

impl Template {
    /// Parse a template, rejecting anything without exactly four slots
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidTemplate`] when the slot count is wrong
    pub fn parse(source: &str) -> Result<Self> {
        let segments: Vec<String> = source.split(SLOT).map(str::to_string).collect();
        let slots = segments.len() - 1;
        if slots != SLOT_COUNT {
            return Err(LoggerError::invalid_template(source, slots));
        }
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// `"{} {} {}: {}"`
    pub fn simple() -> Self {
        Self::from_parts(["", " ", " ", ": ", ""], "{} {} {}: {}")
    }

    /// `"[{}] {} - {}: {}"`
    pub fn bracketed() -> Self {
        Self::from_parts(["[", "] ", " - ", ": ", ""], "[{}] {} - {}: {}")
    }

    fn from_parts(parts: [&str; SLOT_COUNT + 1], source: &str) -> Self {
        Self {
            source: source.to_string(),
            segments: parts.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Fill the slots in order
    pub fn render(&self, values: [&str; SLOT_COUNT]) -> String {
        let capacity = self.source.len() + values.iter().map(|v| v.len()).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.segments[0]);
        for (value, literal) in values.iter().zip(&self.segments[1..]) {
            out.push_str(value);
            out.push_str(literal);
        }
        out
    }
}

impl FromStr for Template {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Template::parse(s)
    }
}

impl TryFrom<String> for Template {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self> {
        Template::parse(&value)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.source
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A formatted line in both its plain and colorized forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    /// The line as produced by the template
    pub plain: String,
    /// `plain` wrapped in the severity color and a reset escape
    pub colored: String,
}

/// Render a UTC timestamp as RFC 3339 with up to nanosecond precision.
///
/// Trailing zeros of the fractional second are trimmed and the fraction is
/// omitted entirely when it is zero.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use esl_logger::core::formatter::rfc3339_nano;
///
/// let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(rfc3339_nano(&t), "2024-01-02T03:04:05Z");
/// ```
pub fn rfc3339_nano(timestamp: &DateTime<Utc>) -> String {
    let seconds = timestamp.format("%Y-%m-%dT%H:%M:%S");
    let nanos = timestamp.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos == 0 {
        return format!("{}Z", seconds);
    }
    let fraction = format!("{:09}", nanos);
    format!("{}.{}Z", seconds, fraction.trim_end_matches('0'))
}

/// Format one log line.
///
/// The message is rendered first, then placed into the template's slots
/// together with the timestamp, name and severity label.
pub fn format(
    template: &Template,
    timestamp: &DateTime<Utc>,
    name: &str,
    severity: Severity,
    message: impl Display,
) -> FormattedLine {
    let body = message.to_string();
    let stamp = rfc3339_nano(timestamp);
    let plain = template.render([&stamp, name, severity.to_str(), &body]);
    let colored = format!("{}{}{}", severity.color_escape(), plain, COLOR_RESET);
    FormattedLine { plain, colored }
}
