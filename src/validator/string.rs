//! String type validator
//!
//! Check order: type guard, enum, pattern, date-time coercion, length,
//! email, uuid, date. The first failure wins. Checks after the date-time
//! coercion still look at the original string.

use super::constraint::{check_enum, check_length, check_pattern};
use super::format::{
    coerce_date_time, validate_date_format, validate_email_format, validate_uuid_format,
};
use super::SchemaValidator;
use crate::schema::{Schema, ValidationError, ValidationResult};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    /// Validates `value` against a `type: string` schema.
    pub(crate) fn coerce_string(&self, value: &Value, schema: &Schema) -> ValidationResult {
        let Value::String(text) = value else {
            return Err(ValidationError::invalid_type(
                value,
                schema.expected_kind(),
                &schema.object_reference,
            )
            .into());
        };

        check_enum(value, schema)?;
        check_pattern(text, schema)?;

        let coerced = match self.options.datetime_coercer.as_deref() {
            Some(coercer) => coerce_date_time(text, schema, coercer)?,
            None => value.clone(),
        };

        check_length(text, schema)?;
        validate_email_format(text, schema)?;
        validate_uuid_format(text, schema)?;
        validate_date_format(text, schema)?;

        Ok(coerced)
    }
}
