//! Object type validator
//!
//! Validation semantics:
//! - Each present property is validated against its property schema
//! - Keys without a property schema follow `additionalProperties`
//! - All `required` keys missing from the value are reported together
//!
//! Properties are visited in key order. The first failing property stops
//! validation and its error is returned as-is, located at the property's
//! schema node.

use std::collections::BTreeMap;

use super::{Context, SchemaValidator};
use crate::schema::{AdditionalProperties, Schema, ValidationError, ValidationResult};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    /// Validates `value` against a `type: object` schema.
    pub(crate) fn coerce_object<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        let Value::Object(entries) = value else {
            return Err(ValidationError::invalid_type(
                value,
                schema.expected_kind(),
                &schema.object_reference,
            )
            .into());
        };

        let mut coerced = BTreeMap::new();
        let mut undefined = Vec::new();

        for (name, property) in entries {
            let out = match (schema.properties.get(name), &schema.additional_properties) {
                (Some(property_schema), _) => {
                    self.dispatch(property, property_schema, &Context::default())?
                }
                (None, Some(AdditionalProperties::Schema(extra))) => {
                    self.dispatch(property, extra, &Context::default())?
                }
                (None, Some(AdditionalProperties::Allowed(false))) => {
                    if !ctx.allows_undeclared(name) {
                        undefined.push(name.clone());
                    }
                    property.clone()
                }
                (None, _) => property.clone(),
            };
            coerced.insert(name.clone(), out);
        }

        if !undefined.is_empty() {
            return Err(ValidationError::NotExistPropertyDefinition {
                keys: undefined,
                reference: schema.object_reference.clone(),
            }
            .into());
        }

        let missing: Vec<String> = schema
            .required
            .iter()
            .filter(|key| !entries.contains_key(key.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::NotExistRequiredKey {
                keys: missing,
                reference: schema.object_reference.clone(),
            }
            .into());
        }

        Ok(Value::Object(coerced))
    }
}
