//! Format validators
//!
//! Each check runs only when `schema.format` names it; otherwise the
//! value passes through. `date-time` is the one format that changes the
//! value's representation, and only when a coercer is configured.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate};
use regex::Regex;
use thiserror::Error;

use crate::schema::{FatalError, Schema, ValidationError, ValidationResult};
use crate::value::Value;

pub const EMAIL: &str = "email";
pub const UUID: &str = "uuid";
pub const DATE: &str = "date";
pub const DATE_TIME: &str = "date-time";

/// Mailbox grammar of RFC 5322 `addr-spec` as used by `mailto:` URIs.
const EMAIL_PATTERN: &str = r"\A[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\z";

/// Unanchored, like `pattern`: a value containing a UUID conforms.
const UUID_PATTERN: &str =
    r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}";

const DATE_PATTERN: &str = r"\A\d{4}-\d{2}-\d{2}\z";

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("invalid email regex constant"))
}

fn uuid_regex() -> &'static Regex {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    UUID_RE.get_or_init(|| Regex::new(UUID_PATTERN).expect("invalid uuid regex constant"))
}

fn date_regex() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("invalid date regex constant"))
}

fn has_format(schema: &Schema, name: &str) -> bool {
    schema.format.as_deref() == Some(name)
}

/// Failure from a [`DateTimeCoercer`]
#[derive(Debug, Error)]
pub enum DateTimeParseError {
    /// The input is not date-time syntax; the value is rejected
    #[error("invalid date: {0}")]
    Malformed(String),
    /// Anything else; validation stops with a fatal error
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Strategy that parses ISO-8601 date-times into the coerced
/// representation.
pub trait DateTimeCoercer: Send + Sync + fmt::Debug {
    fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, DateTimeParseError>;
}

/// RFC 3339 date-times: date, time, offset or `Z`, optional fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339Coercer;

impl DateTimeCoercer for Rfc3339Coercer {
    fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, DateTimeParseError> {
        DateTime::parse_from_rfc3339(input).map_err(|e| DateTimeParseError::Malformed(e.to_string()))
    }
}

/// Coerces a `date-time` string.
///
/// Returns the parsed date-time, or the unchanged string when the schema
/// has another format. Malformed syntax is the schema's type-mismatch
/// error; any other coercer failure is fatal.
pub(crate) fn coerce_date_time(
    value: &str,
    schema: &Schema,
    coercer: &dyn DateTimeCoercer,
) -> ValidationResult {
    if !has_format(schema, DATE_TIME) {
        return Ok(Value::from(value));
    }

    match coercer.parse(value) {
        Ok(parsed) => Ok(Value::DateTime(parsed)),
        Err(DateTimeParseError::Malformed(_)) => Err(ValidationError::invalid_type(
            &Value::from(value),
            schema.expected_kind(),
            &schema.object_reference,
        )
        .into()),
        Err(DateTimeParseError::Other(source)) => Err(FatalError::DateTimeCoercion {
            value: value.to_string(),
            reference: schema.object_reference.clone(),
            source,
        }
        .into()),
    }
}

pub(crate) fn validate_email_format(value: &str, schema: &Schema) -> Result<(), ValidationError> {
    if !has_format(schema, EMAIL) || email_regex().is_match(value) {
        return Ok(());
    }
    Err(ValidationError::InvalidEmailFormat {
        value: Value::from(value),
        reference: schema.object_reference.clone(),
    })
}

/// `8-4-4-4-12` hex groups, case-insensitive, anywhere in the value.
pub(crate) fn validate_uuid_format(value: &str, schema: &Schema) -> Result<(), ValidationError> {
    if !has_format(schema, UUID) || uuid_regex().is_match(value) {
        return Ok(());
    }
    Err(ValidationError::InvalidUuidFormat {
        value: Value::from(value),
        reference: schema.object_reference.clone(),
    })
}

/// `YYYY-MM-DD` naming a real calendar day.
pub(crate) fn validate_date_format(value: &str, schema: &Schema) -> Result<(), ValidationError> {
    if !has_format(schema, DATE) {
        return Ok(());
    }
    if date_regex().is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    Err(ValidationError::InvalidDateFormat {
        value: Value::from(value),
        reference: schema.object_reference.clone(),
    })
}
