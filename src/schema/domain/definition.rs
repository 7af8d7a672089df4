//! Schema definition aggregate root.

use super::{
    FieldConstraint, FieldDefinition, FieldName, SchemaDomainError, SchemaId, SchemaType,
    SchemaUri, SchemaVersion,
};
use crate::validation::{ValidationReport, Violation};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `$schema` value of generated documents.
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Operator-defined extension schema: identity, metadata, and ordered fields.
///
/// Fields are kept sorted by `(order, name)`, which is both the display
/// order and the order used when generating JSON Schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    id: SchemaId,
    uri: SchemaUri,
    schema_type: SchemaType,
    version: SchemaVersion,
    description: String,
    example_data: Option<Value>,
    is_active: bool,
    fields: Vec<FieldConstraint>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted schema definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSchemaData {
    /// Persisted schema identifier.
    pub id: SchemaId,
    /// Persisted schema URI.
    pub uri: SchemaUri,
    /// Persisted type tag.
    pub schema_type: SchemaType,
    /// Persisted version tag.
    pub version: SchemaVersion,
    /// Persisted description.
    pub description: String,
    /// Persisted example payload.
    pub example_data: Option<Value>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted fields in any order.
    pub fields: Vec<FieldConstraint>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SchemaDefinition {
    /// Creates an active schema without fields.
    #[must_use]
    pub fn new(
        uri: SchemaUri,
        schema_type: SchemaType,
        version: SchemaVersion,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SchemaId::new(),
            uri,
            schema_type,
            version,
            description: String::new(),
            example_data: None,
            is_active: true,
            fields: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a schema from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSchemaData) -> Self {
        let mut schema = Self {
            id: data.id,
            uri: data.uri,
            schema_type: data.schema_type,
            version: data.version,
            description: data.description,
            example_data: data.example_data,
            is_active: data.is_active,
            fields: data.fields,
            created_at: data.created_at,
            updated_at: data.updated_at,
        };
        schema.sort_fields();
        schema
    }

    /// Sets the description at creation time.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_owned();
        self
    }

    /// Sets the example payload at creation time.
    #[must_use]
    pub fn with_example_data(mut self, example: Value) -> Self {
        self.example_data = Some(example);
        self
    }

    /// Adds fields at creation time.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::DuplicateField`] when two fields share a
    /// name.
    pub fn with_fields(
        mut self,
        fields: impl IntoIterator<Item = FieldConstraint>,
    ) -> Result<Self, SchemaDomainError> {
        for field in fields {
            self.insert_field(field)?;
        }
        Ok(self)
    }

    /// Returns the schema identifier.
    #[must_use]
    pub const fn id(&self) -> SchemaId {
        self.id
    }

    /// Returns the schema URI.
    #[must_use]
    pub const fn uri(&self) -> &SchemaUri {
        &self.uri
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn schema_type(&self) -> &SchemaType {
        &self.schema_type
    }

    /// Returns the version tag.
    #[must_use]
    pub const fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the example payload, if any.
    #[must_use]
    pub const fn example_data(&self) -> Option<&Value> {
        self.example_data.as_ref()
    }

    /// Returns whether the schema is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the fields in `(order, name)` order.
    #[must_use]
    pub fn fields(&self) -> &[FieldConstraint] {
        &self.fields
    }

    /// Finds a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldConstraint> {
        self.fields.iter().find(|f| f.name().as_str() == name)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `"{type} {version}"`, the human label of the schema.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.schema_type, self.version)
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>, clock: &impl Clock) {
        self.description = description.into().trim().to_owned();
        self.touch(clock);
    }

    /// Replaces the example payload.
    pub fn set_example_data(&mut self, example: Option<Value>, clock: &impl Clock) {
        self.example_data = example;
        self.touch(clock);
    }

    /// Activates the schema so it appears in the catalog.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.is_active = true;
        self.touch(clock);
    }

    /// Deactivates the schema, hiding it from the catalog.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.touch(clock);
    }

    /// Adds a field.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::DuplicateField`] when the name is taken.
    pub fn add_field(
        &mut self,
        field: FieldConstraint,
        clock: &impl Clock,
    ) -> Result<(), SchemaDomainError> {
        self.insert_field(field)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the field called `name`; the replacement may be renamed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::UnknownField`] when no field is called
    /// `name`, or [`SchemaDomainError::DuplicateField`] when a rename collides
    /// with another field.
    pub fn replace_field(
        &mut self,
        name: &FieldName,
        field: FieldConstraint,
        clock: &impl Clock,
    ) -> Result<(), SchemaDomainError> {
        let position = self
            .fields
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| SchemaDomainError::UnknownField(name.to_string()))?;
        let collides = self
            .fields
            .iter()
            .any(|f| f.name() == field.name() && f.name() != name);
        if collides {
            return Err(SchemaDomainError::DuplicateField(field.name().to_string()));
        }
        if let Some(slot) = self.fields.get_mut(position) {
            *slot = field;
        }
        self.sort_fields();
        self.touch(clock);
        Ok(())
    }

    /// Removes the field called `name` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDomainError::UnknownField`] when no field is called
    /// `name`.
    pub fn remove_field(
        &mut self,
        name: &FieldName,
        clock: &impl Clock,
    ) -> Result<FieldConstraint, SchemaDomainError> {
        let position = self
            .fields
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| SchemaDomainError::UnknownField(name.to_string()))?;
        let removed = self.fields.remove(position);
        self.touch(clock);
        Ok(removed)
    }

    /// Generates the draft-07 JSON Schema document for this schema.
    ///
    /// `required` lists the required fields in field order and is omitted
    /// when no field is required.
    #[must_use]
    pub fn generate_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name().to_string(), field.to_schema_property());
            if field.is_required() {
                required.push(Value::from(field.name().as_str()));
            }
        }

        let description = if self.description.is_empty() {
            format!("{} schema", self.schema_type)
        } else {
            self.description.clone()
        };

        let mut document = Map::new();
        document.insert("$schema".to_owned(), Value::from(JSON_SCHEMA_DRAFT_07));
        document.insert("type".to_owned(), Value::from("object"));
        document.insert("title".to_owned(), Value::from(self.label()));
        document.insert("description".to_owned(), Value::from(description));
        document.insert("properties".to_owned(), Value::Object(properties));
        if !required.is_empty() {
            document.insert("required".to_owned(), Value::Array(required));
        }
        Value::Object(document)
    }

    /// Validates an extension payload against the declared fields.
    ///
    /// Every required field missing from `data` is reported, then every key
    /// of `data` that names a declared field is checked. Keys without a
    /// matching field are accepted as-is. All failures are collected.
    #[must_use]
    pub fn validate_extension_data(&self, data: &Map<String, Value>) -> ValidationReport {
        let mut report = ValidationReport::new();

        for field in self.fields.iter().filter(|f| f.is_required()) {
            if !data.contains_key(field.name().as_str()) {
                report.push(Violation::missing_required(field.name().as_str()));
            }
        }

        for (key, value) in data {
            let Some(field) = self.field(key) else {
                continue;
            };
            if let Err(reason) = field.validate_value(value) {
                report.push(Violation::invalid(key.as_str(), reason));
            }
        }

        report
    }

    /// Returns the API-facing field summaries in `(order, name)` order.
    #[must_use]
    pub fn field_definitions(&self) -> Vec<FieldDefinition> {
        self.fields.iter().map(FieldConstraint::definition).collect()
    }

    fn insert_field(&mut self, field: FieldConstraint) -> Result<(), SchemaDomainError> {
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(SchemaDomainError::DuplicateField(field.name().to_string()));
        }
        self.fields.push(field);
        self.sort_fields();
        Ok(())
    }

    fn sort_fields(&mut self) {
        self.fields.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
