//! Validation engine for aeroschema
//!
//! `SchemaValidator::validate` is the single entry point. It routes a
//! (value, schema) pair to the validator for the schema's declared type
//! and returns either the coerced value or the first error met.
//!
//! # Design Principles
//!
//! - Schemas and input values are never mutated
//! - Same (value, schema) pair, same result
//! - First failure wins; no error aggregation
//! - Taxonomy errors are returned, fatal errors are never downgraded
//! - Safe to share across threads: no interior mutability anywhere

mod array;
mod composite;
mod config;
mod constraint;
mod discriminator;
mod format;
mod object;
mod primitive;
mod string;

pub use config::ValidatorOptions;
pub use format::{
    DateTimeCoercer, DateTimeParseError, Rfc3339Coercer, DATE, DATE_TIME, EMAIL, UUID,
};

use crate::observability::{Event, Logger};
use crate::schema::{
    FatalError, Schema, SchemaError, SchemaRegistry, SchemaType, ValidationError,
    ValidationResult,
};
use crate::value::Value;

/// Per-path validation state.
///
/// Property values and array items start from a fresh context; `allOf`
/// parts and resolved discriminator variants inherit their parent's.
#[derive(Debug, Clone, Default)]
pub(crate) struct Context<'s> {
    /// Validating one part of an `allOf`
    all_of_part: bool,
    /// Discriminator schemas already resolved on this path
    resolving: Vec<&'s Schema>,
}

impl<'s> Context<'s> {
    fn all_of_part(&self) -> Self {
        Self {
            all_of_part: true,
            resolving: self.resolving.clone(),
        }
    }

    fn resolving(&self, schema: &'s Schema) -> Self {
        let mut next = self.clone();
        next.resolving.push(schema);
        next
    }

    fn is_resolving(&self, schema: &Schema) -> bool {
        self.resolving.iter().any(|s| std::ptr::eq(*s, schema))
    }

    /// Whether an object may carry `key` without declaring it.
    ///
    /// `allOf` parts see only a slice of the properties, and the
    /// discriminant property belongs to the parent schema.
    fn allows_undeclared(&self, key: &str) -> bool {
        self.all_of_part
            || self.resolving.iter().any(|s| {
                s.discriminator
                    .as_ref()
                    .is_some_and(|d| d.property_name == key)
            })
    }
}

/// Schema validator that coerces and validates values.
///
/// Schemas referenced with `$ref` or from a discriminator mapping are
/// looked up in the registry.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    options: ValidatorOptions,
    logger: Logger,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator with default options.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self::with_options(registry, ValidatorOptions::default())
    }

    /// Creates a validator with the given options.
    pub fn with_options(registry: &'a SchemaRegistry, options: ValidatorOptions) -> Self {
        Self {
            registry,
            logger: Logger::new(options.log_threshold),
            options,
        }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Validates `value` against `schema`.
    ///
    /// # Errors
    ///
    /// - `SchemaError::Validation` when the value is rejected
    /// - `SchemaError::Fatal` when the schema or the coercer is broken
    pub fn validate(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let result = self.dispatch(value, schema, &Context::default());
        if let Err(err) = &result {
            self.log_failure(err);
        }
        result
    }

    /// Validates a decoded JSON document.
    pub fn validate_json(&self, value: serde_json::Value, schema: &Schema) -> ValidationResult {
        self.validate(&Value::from(value), schema)
    }

    /// Validates `value` against the registered component `name`.
    pub fn validate_component(&self, value: &Value, name: &str) -> ValidationResult {
        let schema = self.registry.get(name).ok_or_else(|| {
            let err = SchemaError::from(FatalError::UnknownComponent {
                name: name.to_string(),
            });
            self.log_failure(&err);
            err
        })?;
        self.validate(value, schema)
    }

    /// Routes the value to the validator for the schema.
    pub(crate) fn dispatch<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        if let Some(target) = &schema.reference {
            let resolved = self.resolve(target, schema)?;
            return self.dispatch(value, resolved, ctx);
        }

        if value.is_null() {
            if schema.nullable {
                return Ok(Value::Null);
            }
            if !schema.is_composite() {
                return Err(ValidationError::NotNull {
                    reference: schema.object_reference.clone(),
                }
                .into());
            }
        }

        if let Some(discriminator) = &schema.discriminator {
            if !ctx.is_resolving(schema) {
                return self.validate_discriminated(value, schema, discriminator, ctx);
            }
        }

        if schema.is_composite() {
            return self.validate_composite(value, schema, ctx);
        }

        match &schema.schema_type {
            Some(SchemaType::String) => self.coerce_string(value, schema),
            Some(SchemaType::Integer) => self.coerce_integer(value, schema),
            Some(SchemaType::Number) => self.coerce_number(value, schema),
            Some(SchemaType::Boolean) => self.coerce_boolean(value, schema),
            Some(SchemaType::Array) => self.coerce_array(value, schema),
            Some(SchemaType::Object) => self.coerce_object(value, schema, ctx),
            Some(SchemaType::Unsupported(kind)) => {
                self.logger.emit(
                    Event::UnsupportedSchemaKind,
                    &[("kind", kind.as_str()), ("reference", schema.object_reference.as_str())],
                );
                Err(ValidationError::UnsupportedSchemaKind {
                    kind: kind.clone(),
                    reference: schema.object_reference.clone(),
                }
                .into())
            }
            // No declared type: anything non-null passes unchanged
            None => Ok(value.clone()),
        }
    }

    /// Looks up a `$ref` or mapping target.
    pub(crate) fn resolve(&self, target: &str, from: &Schema) -> Result<&'a Schema, FatalError> {
        self.registry
            .resolve(target)
            .ok_or_else(|| FatalError::UnresolvedReference {
                target: target.to_string(),
                reference: from.object_reference.clone(),
            })
    }

    fn log_failure(&self, err: &SchemaError) {
        let message = err.to_string();
        match err {
            SchemaError::Validation(e) => self.logger.emit(
                Event::ValidationRejected,
                &[("code", e.code()), ("message", message.as_str())],
            ),
            SchemaError::Fatal(_) => self
                .logger
                .emit(Event::ValidationFatal, &[("message", message.as_str())]),
        }
    }
}
