//! allOf / anyOf / oneOf
//!
//! Fatal errors from any part stop validation immediately; only taxonomy
//! errors count as "this part does not match".

use super::{Context, SchemaValidator};
use crate::schema::{Schema, SchemaError, ValidationError, ValidationResult};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    pub(crate) fn validate_composite<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        if !schema.any_of.is_empty() {
            return self.validate_any_of(value, schema, ctx);
        }
        if !schema.all_of.is_empty() {
            return self.validate_all_of(value, schema, ctx);
        }
        self.validate_one_of(value, schema, ctx)
    }

    /// Every part must accept the value. Coercions made by any part are
    /// kept.
    fn validate_all_of<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        let part_ctx = ctx.all_of_part();
        let mut merged = value.clone();
        for part in &schema.all_of {
            let out = self.dispatch(value, part, &part_ctx)?;
            merged = merge_coerced(merged, out, value);
        }
        Ok(merged)
    }

    /// The first accepting part wins.
    fn validate_any_of<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        for part in &schema.any_of {
            match self.dispatch(value, part, ctx) {
                Ok(out) => return Ok(out),
                Err(SchemaError::Validation(_)) => continue,
                Err(fatal) => return Err(fatal),
            }
        }
        Err(ValidationError::NotAnyOf {
            value: value.clone(),
            reference: schema.object_reference.clone(),
        }
        .into())
    }

    /// Exactly one part must accept.
    fn validate_one_of<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        let mut accepted = None;
        let mut matches = 0;
        for part in &schema.one_of {
            match self.dispatch(value, part, ctx) {
                Ok(out) => {
                    matches += 1;
                    accepted.get_or_insert(out);
                }
                Err(SchemaError::Validation(_)) => {}
                Err(fatal) => return Err(fatal),
            }
        }

        match accepted {
            Some(out) if matches == 1 => Ok(out),
            _ => Err(ValidationError::NotOneOf {
                value: value.clone(),
                reference: schema.object_reference.clone(),
            }
            .into()),
        }
    }
}

/// Folds one part's output into the accumulated result, keeping only
/// what the part actually changed relative to `original`.
fn merge_coerced(merged: Value, out: Value, original: &Value) -> Value {
    match (merged, out) {
        (Value::Object(mut acc), Value::Object(next)) => {
            for (key, coerced) in next {
                if original.get(&key) != Some(&coerced) {
                    acc.insert(key, coerced);
                }
            }
            Value::Object(acc)
        }
        (merged, out) => {
            if &out != original {
                out
            } else {
                merged
            }
        }
    }
}
