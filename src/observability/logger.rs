//! Structured JSON logger for aeroschema
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields in alphabetical order
//! - Synchronous, no buffering
//! - Lines below the logger's threshold are dropped

use std::fmt;
use std::io::{self, Write};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-value detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Schema problems that do not stop validation
    Warn = 2,
    /// Fatal validation errors
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
///
/// WARN and ERROR go to stderr, everything else to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    threshold: Severity,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Severity::Warn)
    }
}

impl Logger {
    /// Creates a logger that emits events at `threshold` or above.
    pub fn new(threshold: Severity) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Returns whether an event of this severity would be written.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    /// Log an event with fields
    pub fn emit(&self, event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        if !self.enabled(severity) {
            return;
        }
        if writes_to_stderr(severity) {
            write_line(severity, event.as_str(), fields, &mut io::stderr());
        } else {
            write_line(severity, event.as_str(), fields, &mut io::stdout());
        }
    }
}

/// WARN and above never reach stdout.
fn writes_to_stderr(severity: Severity) -> bool {
    severity >= Severity::Warn
}

/// Writes one JSON line to `writer`
fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
    let mut output = String::with_capacity(256);

    output.push_str("{\"event\":\"");
    escape_json_string(&mut output, event);
    output.push_str("\",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push_str("}\n");

    // Logging must never fail validation
    let _ = writer.write_all(output.as_bytes());
    let _ = writer.flush();
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
fn capture_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    write_line(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_threshold_filters() {
        let logger = Logger::default();
        assert!(!logger.enabled(Severity::Trace));
        assert!(logger.enabled(Severity::Warn));
        assert!(logger.enabled(Severity::Error));

        let verbose = Logger::new(Severity::Trace);
        assert!(verbose.enabled(Severity::Trace));
    }

    #[test]
    fn test_warnings_and_errors_use_stderr() {
        assert!(!writes_to_stderr(Severity::Trace));
        assert!(!writes_to_stderr(Severity::Info));
        assert!(writes_to_stderr(Severity::Warn));
        assert!(writes_to_stderr(Severity::Error));

        // Nothing the default threshold lets through reaches stdout
        let logger = Logger::default();
        for severity in [Severity::Trace, Severity::Info, Severity::Warn, Severity::Error] {
            assert!(!logger.enabled(severity) || writes_to_stderr(severity));
        }
    }

    #[test]
    fn test_line_is_json() {
        let output = capture_line(
            Severity::Warn,
            "SCHEMA_UNSUPPORTED_KIND",
            &[("kind", "file"), ("reference", "#/components/schemas/Upload")],
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "SCHEMA_UNSUPPORTED_KIND");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["kind"], "file");
    }

    #[test]
    fn test_deterministic_ordering() {
        let a = capture_line(Severity::Trace, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = capture_line(Severity::Trace, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
        assert!(a.find("\"event\"").unwrap() < a.find("\"severity\"").unwrap());
    }

    #[test]
    fn test_escapes_special_chars() {
        let output = capture_line(
            Severity::Trace,
            "E",
            &[("value", "\"quoted\"\nline2\u{1}")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["value"], "\"quoted\"\nline2\u{1}");
        assert_eq!(output.matches('\n').count(), 1);
    }
}
