//! Schema node definitions
//!
//! The vocabulary follows the OpenAPI 3.0 data-type subset of JSON Schema:
//! - type, format, pattern, minLength, maxLength, enum, nullable
//! - minimum, maximum, exclusiveMinimum, exclusiveMaximum
//! - items, minItems, maxItems, uniqueItems
//! - properties, required, additionalProperties
//! - allOf, anyOf, oneOf, discriminator, $ref
//!
//! Nodes are built once (deserialized, then anchored by the registry) and
//! are read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::Value;

/// Declared `type` of a schema node
///
/// Anything outside the supported set is kept as `Unsupported` so the
/// dispatcher can reject it with the offending name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// A declared type with no validator
    Unsupported(String),
}

impl SchemaType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Unsupported(name) => name,
        }
    }
}

impl From<String> for SchemaType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => SchemaType::String,
            "integer" => SchemaType::Integer,
            "number" => SchemaType::Number,
            "boolean" => SchemaType::Boolean,
            "array" => SchemaType::Array,
            "object" => SchemaType::Object,
            _ => SchemaType::Unsupported(name),
        }
    }
}

impl From<SchemaType> for String {
    fn from(kind: SchemaType) -> Self {
        kind.type_name().to_string()
    }
}

/// Polymorphic variant selection
///
/// `mapping` goes from discriminant value to a schema reference such as
/// `#/components/schemas/Cat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// Property of the value that carries the discriminant
    pub property_name: String,
    /// Discriminant value → target schema reference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,
}

impl Discriminator {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            mapping: BTreeMap::new(),
        }
    }

    /// Adds a mapping entry.
    pub fn map(mut self, discriminant: impl Into<String>, target: impl Into<String>) -> Self {
        self.mapping.insert(discriminant.into(), target.into());
        self
    }

    /// Returns the mapped target reference for a discriminant value.
    pub fn target(&self, discriminant: &str) -> Option<&str> {
        self.mapping.get(discriminant).map(String::as_str)
    }
}

/// `additionalProperties`: either a flag or a schema for extra values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// A schema node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Reference to another schema, resolved through the registry
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Declared type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Regex source; strings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Allowed literal values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// Location of this node within the schema document, for error reports
    #[serde(skip)]
    pub object_reference: String,
}

impl Schema {
    /// Create a schema of the given type
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Create a string schema
    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Create an integer schema
    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    /// Create a number schema
    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    /// Create a boolean schema
    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    /// Create an array schema with the given item schema
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type(SchemaType::Array)
        }
    }

    /// Create an object schema
    pub fn object<I, K>(properties: I, required: &[&str]) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(|(k, s)| (k.into(), s)).collect(),
            required: required.iter().map(|k| k.to_string()).collect(),
            ..Self::of_type(SchemaType::Object)
        }
    }

    /// Create a `$ref` schema
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_discriminator(mut self, discriminator: Discriminator) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns true when the node composes other schemas.
    pub fn is_composite(&self) -> bool {
        !self.all_of.is_empty() || !self.any_of.is_empty() || !self.one_of.is_empty()
    }

    /// Describes the expected kind for type-mismatch errors, e.g.
    /// `string` or `string(date-time)`.
    pub fn expected_kind(&self) -> String {
        let base = self
            .schema_type
            .as_ref()
            .map(SchemaType::type_name)
            .unwrap_or("any");
        match &self.format {
            Some(format) => format!("{}({})", base, format),
            None => base.to_string(),
        }
    }

    /// Anchors this node and every nested node at `location`.
    ///
    /// Children are located the way a JSON pointer into the document
    /// would reach them (`<location>/properties/<name>`, `<location>/items`,
    /// `<location>/allOf/<i>`, ...).
    pub fn anchored_at(mut self, location: impl Into<String>) -> Self {
        self.anchor(&location.into());
        self
    }

    pub(crate) fn anchor(&mut self, location: &str) {
        self.object_reference = location.to_string();

        for (name, child) in self.properties.iter_mut() {
            child.anchor(&format!("{}/properties/{}", location, name));
        }
        if let Some(items) = self.items.as_mut() {
            items.anchor(&format!("{}/items", location));
        }
        if let Some(AdditionalProperties::Schema(extra)) = self.additional_properties.as_mut() {
            extra.anchor(&format!("{}/additionalProperties", location));
        }
        for (keyword, parts) in [
            ("allOf", &mut self.all_of),
            ("anyOf", &mut self.any_of),
            ("oneOf", &mut self.one_of),
        ] {
            for (i, part) in parts.iter_mut().enumerate() {
                part.anchor(&format!("{}/{}/{}", location, keyword, i));
            }
        }
    }
}
