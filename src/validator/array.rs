//! Array type validator

use super::constraint::{check_item_count, check_unique_items};
use super::{Context, SchemaValidator};
use crate::schema::{Schema, SchemaResult, ValidationError, ValidationResult};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    /// Validates `value` against a `type: array` schema.
    ///
    /// Every item is validated against `items`; the first failing item
    /// stops validation and its error is returned as-is.
    pub(crate) fn coerce_array<'s>(&'s self, value: &Value, schema: &'s Schema) -> ValidationResult {
        let Value::Array(items) = value else {
            return Err(ValidationError::invalid_type(
                value,
                schema.expected_kind(),
                &schema.object_reference,
            )
            .into());
        };

        check_item_count(value, items.len(), schema)?;
        check_unique_items(value, items, schema)?;

        let Some(item_schema) = schema.items.as_deref() else {
            return Ok(value.clone());
        };

        items
            .iter()
            .map(|item| self.dispatch(item, item_schema, &Context::default()))
            .collect::<SchemaResult<Vec<_>>>()
            .map(Value::Array)
    }
}
