//! Schema error types
//!
//! Two channels, never conflated:
//! - `ValidationError` (REJECT): the closed taxonomy of expected
//!   validation failures, returned to the caller
//! - `FatalError` (FATAL): programmer or environment errors such as a
//!   corrupt pattern regex, surfaced unmodified
//!
//! Every message is deterministic and names the schema location.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The value is rejected
    Reject,
    /// The engine cannot continue with this schema
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Why a discriminator could not select a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorFailure {
    /// The value has no such property
    MissingProperty,
    /// The property is present but not a string
    NotAString,
    /// The string has no mapping entry
    Unmapped,
}

impl fmt::Display for DiscriminatorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscriminatorFailure::MissingProperty => write!(f, "does not exist"),
            DiscriminatorFailure::NotAString => write!(f, "is not a string"),
            DiscriminatorFailure::Unmapped => write!(f, "has no mapping entry"),
        }
    }
}

/// Expected validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Runtime kind does not match the declared type
    #[error("{value} class is {actual} but it's not valid {expected} in {reference}")]
    InvalidType {
        value: Value,
        expected: String,
        actual: &'static str,
        reference: String,
    },

    /// Null given to a schema without `nullable`
    #[error("{reference} does not allow null values")]
    NotNull { reference: String },

    #[error("{value} isn't part of the enum in {reference}")]
    InvalidEnumValue {
        value: Value,
        allowed: Vec<Value>,
        reference: String,
    },

    #[error("{reference} pattern {pattern} does not match value: {value}")]
    InvalidPattern {
        value: Value,
        pattern: String,
        reference: String,
    },

    #[error("{reference} {value} is longer than max length")]
    MoreThanMaxLength {
        value: Value,
        max_length: usize,
        reference: String,
    },

    #[error("{reference} {value} is shorter than min length")]
    LessThanMinLength {
        value: Value,
        min_length: usize,
        reference: String,
    },

    #[error("{reference} email address format does not match value: {value}")]
    InvalidEmailFormat { value: Value, reference: String },

    #[error("{reference} Value: {value} is not conformant with UUID format")]
    InvalidUuidFormat { value: Value, reference: String },

    #[error("{reference} Value: {value} is not conformant with date format")]
    InvalidDateFormat { value: Value, reference: String },

    #[error("{reference} {value} is {} minimum value {minimum}", lower_bound(.exclusive))]
    LessThanMinimum {
        value: Value,
        minimum: f64,
        exclusive: bool,
        reference: String,
    },

    #[error("{reference} {value} is {} maximum value {maximum}", upper_bound(.exclusive))]
    MoreThanMaximum {
        value: Value,
        maximum: f64,
        exclusive: bool,
        reference: String,
    },

    #[error("{reference} {value} contains more than max items")]
    MoreThanMaxItems {
        value: Value,
        max_items: usize,
        reference: String,
    },

    #[error("{reference} {value} contains fewer than min items")]
    LessThanMinItems {
        value: Value,
        min_items: usize,
        reference: String,
    },

    #[error("{reference} {value} contains duplicate items")]
    NotUniqueItems { value: Value, reference: String },

    #[error("discriminator property {property_name} {failure} in {reference}")]
    InvalidDiscriminatorMapping {
        property_name: String,
        /// The discriminant found, if any
        value: Option<Value>,
        failure: DiscriminatorFailure,
        reference: String,
    },

    /// Required properties absent from the value
    #[error("required parameters {} not exist in {reference}", .keys.join(","))]
    NotExistRequiredKey { keys: Vec<String>, reference: String },

    /// Properties the schema does not define (`additionalProperties: false`)
    #[error("properties {} are not defined in {reference}", .keys.join(","))]
    NotExistPropertyDefinition { keys: Vec<String>, reference: String },

    #[error("{value} isn't one of in {reference}")]
    NotOneOf { value: Value, reference: String },

    #[error("{value} isn't any of in {reference}")]
    NotAnyOf { value: Value, reference: String },

    #[error("{reference} declares unsupported type {kind}")]
    UnsupportedSchemaKind { kind: String, reference: String },
}

fn lower_bound(exclusive: &bool) -> &'static str {
    if *exclusive {
        "less than or equal to exclusive"
    } else {
        "less than"
    }
}

fn upper_bound(exclusive: &bool) -> &'static str {
    if *exclusive {
        "more than or equal to exclusive"
    } else {
        "more than"
    }
}

impl ValidationError {
    /// The generic type-mismatch error for `value` against a schema
    /// expecting `expected` at `reference`.
    pub fn invalid_type(value: &Value, expected: impl Into<String>, reference: &str) -> Self {
        ValidationError::InvalidType {
            value: value.clone(),
            expected: expected.into(),
            actual: value.kind_name(),
            reference: reference.to_string(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidType { .. } => "SCHEMA_INVALID_TYPE",
            ValidationError::NotNull { .. } => "SCHEMA_NOT_NULL",
            ValidationError::InvalidEnumValue { .. } => "SCHEMA_INVALID_ENUM_VALUE",
            ValidationError::InvalidPattern { .. } => "SCHEMA_INVALID_PATTERN",
            ValidationError::MoreThanMaxLength { .. } => "SCHEMA_MORE_THAN_MAX_LENGTH",
            ValidationError::LessThanMinLength { .. } => "SCHEMA_LESS_THAN_MIN_LENGTH",
            ValidationError::InvalidEmailFormat { .. } => "SCHEMA_INVALID_EMAIL_FORMAT",
            ValidationError::InvalidUuidFormat { .. } => "SCHEMA_INVALID_UUID_FORMAT",
            ValidationError::InvalidDateFormat { .. } => "SCHEMA_INVALID_DATE_FORMAT",
            ValidationError::LessThanMinimum { .. } => "SCHEMA_LESS_THAN_MINIMUM",
            ValidationError::MoreThanMaximum { .. } => "SCHEMA_MORE_THAN_MAXIMUM",
            ValidationError::MoreThanMaxItems { .. } => "SCHEMA_MORE_THAN_MAX_ITEMS",
            ValidationError::LessThanMinItems { .. } => "SCHEMA_LESS_THAN_MIN_ITEMS",
            ValidationError::NotUniqueItems { .. } => "SCHEMA_NOT_UNIQUE_ITEMS",
            ValidationError::InvalidDiscriminatorMapping { .. } => {
                "SCHEMA_INVALID_DISCRIMINATOR_MAPPING"
            }
            ValidationError::NotExistRequiredKey { .. } => "SCHEMA_NOT_EXIST_REQUIRED_KEY",
            ValidationError::NotExistPropertyDefinition { .. } => {
                "SCHEMA_NOT_EXIST_PROPERTY_DEFINITION"
            }
            ValidationError::NotOneOf { .. } => "SCHEMA_NOT_ONE_OF",
            ValidationError::NotAnyOf { .. } => "SCHEMA_NOT_ANY_OF",
            ValidationError::UnsupportedSchemaKind { .. } => "SCHEMA_UNSUPPORTED_KIND",
        }
    }

    /// Returns the location of the failing schema node
    pub fn reference(&self) -> &str {
        match self {
            ValidationError::InvalidType { reference, .. }
            | ValidationError::NotNull { reference }
            | ValidationError::InvalidEnumValue { reference, .. }
            | ValidationError::InvalidPattern { reference, .. }
            | ValidationError::MoreThanMaxLength { reference, .. }
            | ValidationError::LessThanMinLength { reference, .. }
            | ValidationError::InvalidEmailFormat { reference, .. }
            | ValidationError::InvalidUuidFormat { reference, .. }
            | ValidationError::InvalidDateFormat { reference, .. }
            | ValidationError::LessThanMinimum { reference, .. }
            | ValidationError::MoreThanMaximum { reference, .. }
            | ValidationError::MoreThanMaxItems { reference, .. }
            | ValidationError::LessThanMinItems { reference, .. }
            | ValidationError::NotUniqueItems { reference, .. }
            | ValidationError::InvalidDiscriminatorMapping { reference, .. }
            | ValidationError::NotExistRequiredKey { reference, .. }
            | ValidationError::NotExistPropertyDefinition { reference, .. }
            | ValidationError::NotOneOf { reference, .. }
            | ValidationError::NotAnyOf { reference, .. }
            | ValidationError::UnsupportedSchemaKind { reference, .. } => reference,
        }
    }
}

/// Unrecoverable errors
///
/// These indicate a broken schema or coercer, not a bad value.
#[derive(Debug, Error)]
pub enum FatalError {
    /// `pattern` is not a valid regular expression
    #[error("malformed pattern {pattern:?} in {reference}: {source}")]
    MalformedPattern {
        pattern: String,
        reference: String,
        #[source]
        source: regex::Error,
    },

    /// The date-time coercer failed for a reason other than bad syntax
    #[error("date-time coercion of {value:?} failed in {reference}: {source}")]
    DateTimeCoercion {
        value: String,
        reference: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `$ref` or discriminator mapping target is not registered
    #[error("schema reference {target} is not registered (from {reference})")]
    UnresolvedReference { target: String, reference: String },

    /// No component is registered under the requested name
    #[error("schema component {name} is not registered")]
    UnknownComponent { name: String },
}

/// Any error produced while validating
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl SchemaError {
    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            SchemaError::Validation(_) => Severity::Reject,
            SchemaError::Fatal(_) => Severity::Fatal,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the taxonomy error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(e) => Some(e),
            SchemaError::Fatal(_) => None,
        }
    }

    /// Returns the fatal error, if this is one
    pub fn as_fatal(&self) -> Option<&FatalError> {
        match self {
            SchemaError::Validation(_) => None,
            SchemaError::Fatal(e) => Some(e),
        }
    }
}

/// Errors raised while registering schemas
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A schema with this name is already registered
    #[error("schema '{0}' is already registered and immutable")]
    Duplicate(String),

    /// The components document does not have the expected shape
    #[error("malformed components document: {0}")]
    Malformed(String),
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Outcome of validating one value: the coerced value or the error
pub type ValidationResult = SchemaResult<Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_key_message() {
        let err = ValidationError::NotExistRequiredKey {
            keys: vec!["milk_stock".into()],
            reference: "#/components/schemas/Cat".into(),
        };
        assert_eq!(
            err.to_string(),
            "required parameters milk_stock not exist in #/components/schemas/Cat"
        );
    }

    #[test]
    fn test_required_keys_are_joined() {
        let err = ValidationError::NotExistRequiredKey {
            keys: vec!["a".into(), "b".into()],
            reference: "#/x".into(),
        };
        assert!(err.to_string().starts_with("required parameters a,b not exist"));
    }

    #[test]
    fn test_invalid_type_message() {
        let err = ValidationError::invalid_type(&Value::from(1), "string", "#/components/schemas/Pet");
        assert_eq!(
            err.to_string(),
            "1 class is integer but it's not valid string in #/components/schemas/Pet"
        );
        assert_eq!(err.code(), "SCHEMA_INVALID_TYPE");
        assert_eq!(err.reference(), "#/components/schemas/Pet");
    }

    #[test]
    fn test_exclusive_bounds_message() {
        let err = ValidationError::LessThanMinimum {
            value: Value::from(0),
            minimum: 0.0,
            exclusive: true,
            reference: "#/n".into(),
        };
        assert_eq!(
            err.to_string(),
            "#/n 0 is less than or equal to exclusive minimum value 0"
        );
    }

    #[test]
    fn test_discriminator_message() {
        let err = ValidationError::InvalidDiscriminatorMapping {
            property_name: "name".into(),
            value: Some(Value::from("dogs")),
            failure: DiscriminatorFailure::Unmapped,
            reference: "#/components/schemas/Basket".into(),
        };
        assert_eq!(
            err.to_string(),
            "discriminator property name has no mapping entry in #/components/schemas/Basket"
        );
    }

    #[test]
    fn test_severity_levels() {
        let reject = SchemaError::from(ValidationError::NotNull { reference: "#/a".into() });
        assert_eq!(reject.severity(), Severity::Reject);
        assert!(!reject.is_fatal());
        assert!(reject.as_validation().is_some());

        let fatal = SchemaError::from(FatalError::UnresolvedReference {
            target: "#/components/schemas/Missing".into(),
            reference: "#/a".into(),
        });
        assert_eq!(fatal.severity(), Severity::Fatal);
        assert!(fatal.is_fatal());
        assert!(fatal.as_fatal().is_some());
    }

    #[test]
    fn test_unknown_component_message() {
        let fatal = SchemaError::from(FatalError::UnknownComponent { name: "Gone".into() });
        assert!(fatal.is_fatal());
        assert_eq!(fatal.to_string(), "schema component Gone is not registered");
    }

    #[test]
    fn test_fatal_is_displayed_unmodified() {
        let fatal = SchemaError::from(FatalError::UnresolvedReference {
            target: "#/components/schemas/Missing".into(),
            reference: "#/a".into(),
        });
        assert_eq!(
            fatal.to_string(),
            "schema reference #/components/schemas/Missing is not registered (from #/a)"
        );
    }
}
