//! Diesel row models for schema persistence.

use super::schema::{schema_definitions, schema_fields};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for schema definitions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema_definitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SchemaDefinitionRow {
    /// Internal schema identifier.
    pub id: uuid::Uuid,
    /// Schema URI.
    pub uri: String,
    /// Type tag.
    pub schema_type: String,
    /// Version tag.
    pub version: String,
    /// Description.
    pub description: String,
    /// Example payload.
    pub example_data: Option<Value>,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for schema definitions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema_definitions)]
pub struct NewSchemaDefinitionRow {
    /// Internal schema identifier.
    pub id: uuid::Uuid,
    /// Schema URI.
    pub uri: String,
    /// Type tag.
    pub schema_type: String,
    /// Version tag.
    pub version: String,
    /// Description.
    pub description: String,
    /// Example payload.
    pub example_data: Option<Value>,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query and insert row for schema fields.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schema_fields)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SchemaFieldRow {
    /// Owning schema identifier.
    pub schema_id: uuid::Uuid,
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub field_type: String,
    /// Required flag.
    pub required: bool,
    /// Description.
    pub description: String,
    /// Default value.
    pub default_value: Option<Value>,
    /// Minimum string length.
    pub min_length: Option<i64>,
    /// Maximum string length.
    pub max_length: Option<i64>,
    /// Inclusive minimum value.
    pub min_value: Option<f64>,
    /// Inclusive maximum value.
    pub max_value: Option<f64>,
    /// Enum choices.
    pub enum_choices: Option<Value>,
    /// Advertised pattern.
    pub pattern: Option<String>,
    /// Display order.
    pub field_order: i32,
}
