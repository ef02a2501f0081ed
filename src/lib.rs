//! aeroschema - A strict, deterministic coerce-and-validate engine for
//! OpenAPI schemas
//!
//! A decoded value is checked against a schema node and either returned,
//! possibly coerced (date-time strings become date-times), or rejected
//! with exactly one error naming the failing schema location.

pub mod observability;
pub mod schema;
pub mod validator;
pub mod value;

pub use schema::{Schema, SchemaError, SchemaRegistry, ValidationError, ValidationResult};
pub use validator::{SchemaValidator, ValidatorOptions};
pub use value::Value;
