//! Discriminator resolution
//!
//! A schema with a discriminator is Unresolved until the value's
//! discriminant property selects a variant through `mapping`. From then
//! on the value is validated against that variant only:
//! - The original schema's own constraints are not re-applied
//! - A variant failure is final; other mapping entries are never tried
//! - A missing, non-string or unmapped discriminant is rejected

use super::{Context, SchemaValidator};
use crate::observability::Event;
use crate::schema::{
    Discriminator, DiscriminatorFailure, Schema, SchemaResult, ValidationError, ValidationResult,
};
use crate::value::Value;

impl<'a> SchemaValidator<'a> {
    /// Selects the variant schema for `value`.
    pub(crate) fn resolve_discriminator(
        &self,
        value: &Value,
        schema: &Schema,
        discriminator: &Discriminator,
    ) -> SchemaResult<&'a Schema> {
        let reference = &schema.object_reference;
        let Value::Object(entries) = value else {
            return Err(ValidationError::invalid_type(value, "object", reference).into());
        };

        let rejected = |failure: DiscriminatorFailure, found: Option<&Value>| {
            ValidationError::InvalidDiscriminatorMapping {
                property_name: discriminator.property_name.clone(),
                value: found.cloned(),
                failure,
                reference: reference.clone(),
            }
        };

        let discriminant = match entries.get(&discriminator.property_name) {
            Some(Value::String(discriminant)) => discriminant,
            Some(other) => return Err(rejected(DiscriminatorFailure::NotAString, Some(other)).into()),
            None => return Err(rejected(DiscriminatorFailure::MissingProperty, None).into()),
        };

        let target = discriminator.target(discriminant).ok_or_else(|| {
            rejected(
                DiscriminatorFailure::Unmapped,
                entries.get(&discriminator.property_name),
            )
        })?;

        let variant = self.resolve(target, schema)?;
        self.logger.emit(
            Event::DiscriminatorResolved,
            &[
                ("discriminant", discriminant.as_str()),
                ("reference", reference.as_str()),
                ("variant", target),
            ],
        );
        Ok(variant)
    }

    /// Resolves the variant and validates `value` against it.
    pub(crate) fn validate_discriminated<'s>(
        &'s self,
        value: &Value,
        schema: &'s Schema,
        discriminator: &Discriminator,
        ctx: &Context<'s>,
    ) -> ValidationResult {
        let variant = self.resolve_discriminator(value, schema, discriminator)?;
        self.dispatch(value, variant, &ctx.resolving(schema))
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{
        Discriminator, DiscriminatorFailure, Schema, SchemaRegistry, ValidationError,
    };
    use crate::validator::SchemaValidator;
    use crate::value::Value;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                "Cat",
                Schema::object(
                    [("kind", Schema::string()), ("milk_stock", Schema::integer())],
                    &["kind", "milk_stock"],
                ),
            )
            .unwrap();
        registry
            .register(
                "Squirrel",
                Schema::object(
                    [("kind", Schema::string()), ("nut_stock", Schema::integer())],
                    &["kind", "nut_stock"],
                ),
            )
            .unwrap();
        registry
    }

    fn pet() -> Schema {
        let mut schema = Schema::default().with_discriminator(
            Discriminator::new("kind")
                .map("cat", "#/components/schemas/Cat")
                .map("squirrel", "#/components/schemas/Squirrel"),
        );
        schema.one_of = vec![
            Schema::reference("#/components/schemas/Cat"),
            Schema::reference("#/components/schemas/Squirrel"),
        ];
        schema.anchored_at("#/components/schemas/Pet")
    }

    fn failure(err: &crate::schema::SchemaError) -> DiscriminatorFailure {
        match err.as_validation() {
            Some(ValidationError::InvalidDiscriminatorMapping { failure, .. }) => *failure,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_selects_mapped_variant() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        let value = Value::from(json!({ "kind": "squirrel", "nut_stock": 3 }));

        let variant = validator
            .resolve_discriminator(&value, &pet(), pet().discriminator.as_ref().unwrap())
            .unwrap();
        assert_eq!(variant.object_reference, "#/components/schemas/Squirrel");
        assert!(validator.validate(&value, &pet()).is_ok());
    }

    #[test]
    fn test_missing_discriminant() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        let err = validator
            .validate(&Value::from(json!({ "milk_stock": 1 })), &pet())
            .unwrap_err();
        assert_eq!(failure(&err), DiscriminatorFailure::MissingProperty);
    }

    #[test]
    fn test_non_string_discriminant() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        let err = validator
            .validate(&Value::from(json!({ "kind": 7 })), &pet())
            .unwrap_err();
        assert_eq!(failure(&err), DiscriminatorFailure::NotAString);
    }

    #[test]
    fn test_unmapped_discriminant() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        let err = validator
            .validate(&Value::from(json!({ "kind": "dog" })), &pet())
            .unwrap_err();
        assert_eq!(failure(&err), DiscriminatorFailure::Unmapped);
        assert_eq!(err.as_validation().unwrap().reference(), "#/components/schemas/Pet");
    }

    #[test]
    fn test_no_fallback_to_other_variants() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        // Satisfies Squirrel, but the discriminant says cat
        let value = Value::from(json!({ "kind": "cat", "nut_stock": 3 }));

        let err = validator.validate(&value, &pet()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "required parameters milk_stock not exist in #/components/schemas/Cat"
        );
    }

    #[test]
    fn test_unregistered_target_is_fatal() {
        let registry = SchemaRegistry::new();
        let validator = SchemaValidator::new(&registry);
        let err = validator
            .validate(&Value::from(json!({ "kind": "cat" })), &pet())
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_object_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);
        let err = validator.validate(&Value::from("cat"), &pet()).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "SCHEMA_INVALID_TYPE");
    }

    #[test]
    fn test_discriminant_allowed_on_closed_variant() {
        let mut registry = SchemaRegistry::new();
        let cat: Schema = serde_json::from_value(json!({
            "type": "object",
            "required": ["milk_stock"],
            "properties": { "milk_stock": { "type": "integer" } },
            "additionalProperties": false
        }))
        .unwrap();
        registry.register("Cat", cat).unwrap();
        let validator = SchemaValidator::new(&registry);
        let pet = Schema::default()
            .with_discriminator(Discriminator::new("kind").map("cat", "#/components/schemas/Cat"));

        assert!(validator
            .validate(&Value::from(json!({ "kind": "cat", "milk_stock": 1 })), &pet)
            .is_ok());
        let err = validator
            .validate(&Value::from(json!({ "kind": "cat", "milk_stock": 1, "x": 2 })), &pet)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "properties x are not defined in #/components/schemas/Cat"
        );

        // Without the discriminator the same key is undeclared
        let err = validator
            .validate_component(&Value::from(json!({ "kind": "cat", "milk_stock": 1 })), "Cat")
            .unwrap_err();
        assert!(err.to_string().starts_with("properties kind are not defined"));
    }

    #[test]
    fn test_variant_inheriting_base_does_not_loop() {
        let mut registry = SchemaRegistry::new();
        let base: Schema = serde_json::from_value(json!({
            "type": "object",
            "required": ["kind"],
            "properties": { "kind": { "type": "string" } },
            "discriminator": {
                "propertyName": "kind",
                "mapping": { "cat": "#/components/schemas/Cat" }
            }
        }))
        .unwrap();
        let cat: Schema = serde_json::from_value(json!({
            "allOf": [
                { "$ref": "#/components/schemas/Pet" },
                { "type": "object", "required": ["milk_stock"] }
            ]
        }))
        .unwrap();
        registry.register("Pet", base).unwrap();
        registry.register("Cat", cat).unwrap();
        let validator = SchemaValidator::new(&registry);
        let pet = Schema::reference("#/components/schemas/Pet");

        assert!(validator
            .validate(&Value::from(json!({ "kind": "cat", "milk_stock": 1 })), &pet)
            .is_ok());
        let err = validator
            .validate(&Value::from(json!({ "kind": "cat" })), &pet)
            .unwrap_err();
        assert!(err.to_string().starts_with("required parameters milk_stock not exist"));
    }
}
