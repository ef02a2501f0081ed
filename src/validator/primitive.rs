//! Integer, number and boolean type validators
//!
//! Same shape as the string validator: optional string coercion, type
//! guard, enum, then type-specific checks.

use serde_json::Number;

use super::constraint::{check_bounds, check_enum};
use super::SchemaValidator;
use crate::schema::{Schema, SchemaType, ValidationError, ValidationResult};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    pub(crate) fn coerce_integer(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let value = self.coerce_scalar(value, &SchemaType::Integer);
        if value.as_integer().is_none() {
            return Err(type_mismatch(&value, schema).into());
        }

        check_enum(&value, schema)?;
        check_bounds(&value, schema)?;
        Ok(value)
    }

    pub(crate) fn coerce_number(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let value = self.coerce_scalar(value, &SchemaType::Number);
        if value.as_f64().is_none() {
            return Err(type_mismatch(&value, schema).into());
        }

        check_enum(&value, schema)?;
        check_bounds(&value, schema)?;
        Ok(value)
    }

    pub(crate) fn coerce_boolean(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let value = self.coerce_scalar(value, &SchemaType::Boolean);
        if value.as_bool().is_none() {
            return Err(type_mismatch(&value, schema).into());
        }

        check_enum(&value, schema)?;
        Ok(value)
    }

    /// Converts a string into the declared scalar type when value
    /// coercion is enabled. Unparseable strings are left alone so the
    /// type guard reports them.
    fn coerce_scalar(&self, value: &Value, target: &SchemaType) -> Value {
        let Value::String(text) = value else {
            return value.clone();
        };
        if !self.options.coerce_value {
            return value.clone();
        }

        let coerced = match target {
            SchemaType::Integer => text.parse::<i64>().ok().map(Value::from),
            SchemaType::Number => text
                .parse::<i64>()
                .ok()
                .map(Value::from)
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                }),
            SchemaType::Boolean => match text.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        };
        coerced.unwrap_or_else(|| value.clone())
    }
}

fn type_mismatch(value: &Value, schema: &Schema) -> ValidationError {
    ValidationError::invalid_type(value, schema.expected_kind(), &schema.object_reference)
}
