//! Observable validation events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the validation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A discriminator selected a variant schema
    DiscriminatorResolved,
    /// A value was rejected with a taxonomy error
    ValidationRejected,
    /// Validation stopped on a fatal error
    ValidationFatal,
    /// The dispatcher met a declared type it has no validator for
    UnsupportedSchemaKind,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DiscriminatorResolved => "SCHEMA_DISCRIMINATOR_RESOLVED",
            Event::ValidationRejected => "SCHEMA_VALIDATION_REJECTED",
            Event::ValidationFatal => "SCHEMA_VALIDATION_FATAL",
            Event::UnsupportedSchemaKind => "SCHEMA_UNSUPPORTED_KIND",
        }
    }

    /// Returns the severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DiscriminatorResolved | Event::ValidationRejected => Severity::Trace,
            Event::UnsupportedSchemaKind => Severity::Warn,
            Event::ValidationFatal => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
