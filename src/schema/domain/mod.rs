//! Domain model for extension schema definitions.
//!
//! A schema is an ordered list of typed, constrained fields bound to a
//! `(type, version)` identity and a globally unique URI. Schemas validate
//! extension payloads and render themselves as draft-07 JSON Schema.
//! Infrastructure concerns stay outside the domain boundary.

mod bound;
mod catalog;
mod definition;
mod error;
mod field;
mod field_type;
mod identity;
mod ids;

pub use catalog::{CatalogEntry, SchemaCatalog};
pub use definition::{JSON_SCHEMA_DRAFT_07, PersistedSchemaData, SchemaDefinition};
pub use error::{ParseFieldTypeError, SchemaDomainError, ShapeError, ValueError};
pub use field::{
    FieldConstraint, FieldDefinition, FieldKind, FieldSpec, MAX_PATTERN_LENGTH, NumericRange,
    StringRules,
};
pub use field_type::FieldType;
pub use identity::{FieldName, SchemaType, SchemaUri, SchemaVersion};
pub use ids::SchemaId;
