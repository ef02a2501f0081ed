//! Schema model for aeroschema
//!
//! Schemas are immutable once registered. The validation engine only
//! reads them.
//!
//! # Contents
//!
//! - `types`: schema nodes in the OpenAPI data-type vocabulary
//! - `registry`: named components and `$ref` resolution
//! - `errors`: the validation taxonomy and the fatal channel

mod errors;
mod registry;
mod types;

pub use errors::{
    DiscriminatorFailure, FatalError, RegistryError, SchemaError, SchemaResult, Severity,
    ValidationError, ValidationResult,
};
pub use registry::{SchemaRegistry, COMPONENTS_PREFIX};
pub use types::{AdditionalProperties, Discriminator, Schema, SchemaType};
