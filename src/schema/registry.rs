//! Schema registry for named component schemas
//!
//! Components live under `#/components/schemas/<name>`. `$ref` targets and
//! discriminator mapping targets are resolved here.
//! - Registration anchors every node's `object_reference`
//! - Registered schemas are immutable; re-registering a name fails
//! - Lookup never mutates

use std::collections::BTreeMap;

use super::errors::RegistryError;
use super::types::Schema;

/// Reference prefix for component schemas
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// In-memory registry of component schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Schemas indexed by component name
    schemas: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a decoded components document.
    ///
    /// Accepts either a whole OpenAPI document (`components.schemas` is
    /// used) or the bare `schemas` map.
    pub fn from_components(mut document: serde_json::Value) -> Result<Self, RegistryError> {
        let schemas = if document.pointer("/components/schemas").is_some() {
            document["components"]["schemas"].take()
        } else {
            document
        };

        let entries = match schemas {
            serde_json::Value::Object(entries) => entries,
            other => {
                return Err(RegistryError::Malformed(format!(
                    "expected an object of schemas, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut registry = Self::new();
        for (name, raw) in entries {
            let schema: Schema = serde_json::from_value(raw)
                .map_err(|e| RegistryError::Malformed(format!("schema '{}': {}", name, e)))?;
            registry.register(&name, schema)?;
        }
        Ok(registry)
    }

    /// Registers a schema under `name`, anchoring it at
    /// `#/components/schemas/<name>`.
    pub fn register(&mut self, name: &str, schema: Schema) -> Result<(), RegistryError> {
        if self.schemas.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        let schema = schema.anchored_at(format!("{}{}", COMPONENTS_PREFIX, name));
        self.schemas.insert(name.to_string(), schema);
        Ok(())
    }

    /// Gets a schema by component name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Resolves a reference such as `#/components/schemas/Cat`.
    ///
    /// A bare component name is accepted too.
    pub fn resolve(&self, target: &str) -> Option<&Schema> {
        let name = target.strip_prefix(COMPONENTS_PREFIX).unwrap_or(target);
        self.get(name)
    }

    /// Checks if a component exists.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Returns registered component names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Schema {
        Schema::object([("name", Schema::string())], &["name"])
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register("Pet", sample_schema()).unwrap();

        let schema = registry.get("Pet").unwrap();
        assert_eq!(schema.object_reference, "#/components/schemas/Pet");
        assert_eq!(
            schema.properties["name"].object_reference,
            "#/components/schemas/Pet/properties/name"
        );
    }

    #[test]
    fn test_schema_immutability() {
        let mut registry = SchemaRegistry::new();
        registry.register("Pet", sample_schema()).unwrap();

        let result = registry.register("Pet", sample_schema());
        assert!(matches!(result, Err(RegistryError::Duplicate(name)) if name == "Pet"));
    }

    #[test]
    fn test_resolve_reference_forms() {
        let mut registry = SchemaRegistry::new();
        registry.register("Cat", sample_schema()).unwrap();

        assert!(registry.resolve("#/components/schemas/Cat").is_some());
        assert!(registry.resolve("Cat").is_some());
        assert!(registry.resolve("#/components/schemas/Dog").is_none());
    }

    #[test]
    fn test_from_full_document() {
        let registry = SchemaRegistry::from_components(json!({
            "openapi": "3.0.0",
            "components": {
                "schemas": {
                    "Cat": { "type": "object", "required": ["milk_stock"] },
                    "Squirrel": { "type": "object", "required": ["nut_stock"] }
                }
            }
        }))
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Cat", "Squirrel"]);
        assert_eq!(registry.get("Cat").unwrap().required, vec!["milk_stock"]);
    }

    #[test]
    fn test_from_bare_schemas_map() {
        let registry =
            SchemaRegistry::from_components(json!({ "Id": { "type": "string" } })).unwrap();
        assert!(registry.contains("Id"));
    }

    #[test]
    fn test_malformed_document() {
        let result = SchemaRegistry::from_components(json!(["not", "a", "map"]));
        assert!(matches!(result, Err(RegistryError::Malformed(_))));

        let result = SchemaRegistry::from_components(json!({ "Bad": { "minLength": "ten" } }));
        assert!(matches!(result, Err(RegistryError::Malformed(msg)) if msg.contains("Bad")));
    }

    #[test]
    fn test_empty_registry() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("Pet").is_none());
    }
}
