//! Service layer for extension schema management.
//!
//! Provides [`SchemaRegistryService`] which coordinates schema registration,
//! field editing, guarded deletion, catalog building, and payload validation.

use crate::schema::{
    domain::{
        FieldConstraint, FieldName, FieldSpec, SchemaCatalog, SchemaDefinition, SchemaDomainError,
        SchemaId, SchemaType, SchemaUri, SchemaVersion,
    },
    ports::{SchemaRepository, SchemaRepositoryError, SchemaUsage},
};
use crate::validation::ValidationReport;
use mockable::Clock;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for registering a new schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterSchemaRequest {
    uri: String,
    schema_type: String,
    version: String,
    description: String,
    example_data: Option<Value>,
    fields: Vec<FieldSpec>,
    is_active: bool,
}

impl RegisterSchemaRequest {
    /// Creates a request with the schema identity.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        schema_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            schema_type: schema_type.into(),
            version: version.into(),
            description: String::new(),
            example_data: None,
            fields: Vec::new(),
            is_active: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the example payload.
    #[must_use]
    pub fn with_example_data(mut self, example: Value) -> Self {
        self.example_data = Some(example);
        self
    }

    /// Appends a field specification.
    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several field specifications.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Registers the schema as inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Metadata changes for an existing schema. Unset members are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSchemaRequest {
    description: Option<String>,
    example_data: Option<Option<Value>>,
    is_active: Option<bool>,
}

impl UpdateSchemaRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces or clears the example payload.
    #[must_use]
    pub fn with_example_data(mut self, example: Option<Value>) -> Self {
        self.example_data = Some(example);
        self
    }

    /// Activates or deactivates the schema.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Service-level errors for schema registry operations.
#[derive(Debug, Error)]
pub enum SchemaRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SchemaDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] SchemaRepositoryError),
    /// No schema is registered under the URI.
    #[error("no schema registered for URI '{0}'")]
    UnknownUri(SchemaUri),
    /// The schema is still referenced by extension records.
    #[error(
        "cannot delete schema '{uri}': it is referenced by {count} extension record(s); \
         remove those references first"
    )]
    InUse {
        /// URI of the schema.
        uri: SchemaUri,
        /// Number of referencing extension records.
        count: u64,
    },
}

/// Result type for schema registry service operations.
pub type SchemaRegistryServiceResult<T> = Result<T, SchemaRegistryServiceError>;

/// Extension schema orchestration service.
#[derive(Clone)]
pub struct SchemaRegistryService<R, U, C>
where
    R: SchemaRepository,
    U: SchemaUsage,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    usage: Arc<U>,
    clock: Arc<C>,
}

impl<R, U, C> SchemaRegistryService<R, U, C>
where
    R: SchemaRepository,
    U: SchemaUsage,
    C: Clock + Send + Sync,
{
    /// Creates a new schema registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, usage: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            repository,
            usage,
            clock,
        }
    }

    /// Registers a new schema together with its fields.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Domain`] when the identity or a
    /// field is invalid, or [`SchemaRegistryServiceError::Repository`] when
    /// the URI or `(type, version)` pair is already taken.
    pub async fn register(
        &self,
        request: RegisterSchemaRequest,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        let RegisterSchemaRequest {
            uri: raw_uri,
            schema_type: raw_type,
            version: raw_version,
            description,
            example_data,
            fields,
            is_active,
        } = request;

        let uri = SchemaUri::new(raw_uri)?;
        let schema_type = SchemaType::new(raw_type)?;
        let version = SchemaVersion::new(raw_version)?;
        let constraints = fields
            .into_iter()
            .map(FieldConstraint::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut schema = SchemaDefinition::new(uri, schema_type, version, &*self.clock)
            .with_description(description)
            .with_fields(constraints)?;
        if let Some(example) = example_data {
            schema = schema.with_example_data(example);
        }
        if !is_active {
            schema.deactivate(&*self.clock);
        }

        self.repository.create(&schema).await?;
        info!(
            schema_id = %schema.id(),
            uri = %schema.uri(),
            fields = schema.fields().len(),
            "registered extension schema"
        );
        Ok(schema)
    }

    /// Applies metadata changes to a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Repository`] when the schema is
    /// not found or persistence fails.
    pub async fn update(
        &self,
        id: SchemaId,
        request: UpdateSchemaRequest,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        let mut schema = self.find_by_id_or_error(id).await?;
        let clock = &*self.clock;
        if let Some(description) = request.description {
            schema.set_description(description, clock);
        }
        if let Some(example) = request.example_data {
            schema.set_example_data(example, clock);
        }
        match request.is_active {
            Some(true) => schema.activate(clock),
            Some(false) => schema.deactivate(clock),
            None => {}
        }
        self.repository.update(&schema).await?;
        info!(schema_id = %id, "updated extension schema");
        Ok(schema)
    }

    /// Adds a field to a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Domain`] when the field is
    /// invalid or its name is taken, or
    /// [`SchemaRegistryServiceError::Repository`] when the schema is not
    /// found or persistence fails.
    pub async fn add_field(
        &self,
        id: SchemaId,
        field: FieldSpec,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        let constraint = FieldConstraint::new(field)?;
        let field_name = constraint.name().clone();
        let mut schema = self.find_by_id_or_error(id).await?;
        schema.add_field(constraint, &*self.clock)?;
        self.repository.update(&schema).await?;
        info!(schema_id = %id, field = %field_name, "added schema field");
        Ok(schema)
    }

    /// Replaces the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Domain`] when the field is
    /// invalid, unknown, or renamed onto another field, or
    /// [`SchemaRegistryServiceError::Repository`] when persistence fails.
    pub async fn replace_field(
        &self,
        id: SchemaId,
        name: &str,
        field: FieldSpec,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        let field_name = FieldName::new(name)?;
        let constraint = FieldConstraint::new(field)?;
        let mut schema = self.find_by_id_or_error(id).await?;
        schema.replace_field(&field_name, constraint, &*self.clock)?;
        self.repository.update(&schema).await?;
        info!(schema_id = %id, field = %field_name, "replaced schema field");
        Ok(schema)
    }

    /// Removes the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Domain`] when no such field
    /// exists, or [`SchemaRegistryServiceError::Repository`] when persistence
    /// fails.
    pub async fn remove_field(
        &self,
        id: SchemaId,
        name: &str,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        let field_name = FieldName::new(name)?;
        let mut schema = self.find_by_id_or_error(id).await?;
        schema.remove_field(&field_name, &*self.clock)?;
        self.repository.update(&schema).await?;
        info!(schema_id = %id, field = %field_name, "removed schema field");
        Ok(schema)
    }

    /// Finds a schema by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Repository`] when the lookup
    /// fails.
    pub async fn find_by_id(
        &self,
        id: SchemaId,
    ) -> SchemaRegistryServiceResult<Option<SchemaDefinition>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds a schema by URI.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Domain`] when the URI is
    /// malformed, or [`SchemaRegistryServiceError::Repository`] when the
    /// lookup fails.
    pub async fn find_by_uri(
        &self,
        uri: &str,
    ) -> SchemaRegistryServiceResult<Option<SchemaDefinition>> {
        let schema_uri = SchemaUri::new(uri)?;
        Ok(self.repository.find_by_uri(&schema_uri).await?)
    }

    /// Returns every schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Repository`] when the lookup
    /// fails.
    pub async fn list_all(&self) -> SchemaRegistryServiceResult<Vec<SchemaDefinition>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns active schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Repository`] when the lookup
    /// fails.
    pub async fn list_active(&self) -> SchemaRegistryServiceResult<Vec<SchemaDefinition>> {
        Ok(self.repository.list_active().await?)
    }

    /// Deletes a schema that no extension record references.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::InUse`] with the reference
    /// count while extension records point at the schema URI, or
    /// [`SchemaRegistryServiceError::Repository`] when the schema is not
    /// found or persistence fails.
    pub async fn delete(&self, id: SchemaId) -> SchemaRegistryServiceResult<()> {
        let schema = self.find_by_id_or_error(id).await?;
        let count = self.usage.count_schema_references(schema.uri()).await?;
        if count > 0 {
            warn!(
                schema_id = %id,
                uri = %schema.uri(),
                references = count,
                "refusing to delete referenced extension schema"
            );
            return Err(SchemaRegistryServiceError::InUse {
                uri: schema.uri().clone(),
                count,
            });
        }
        self.repository.delete(id).await?;
        info!(schema_id = %id, uri = %schema.uri(), "deleted extension schema");
        Ok(())
    }

    /// Builds the catalog of active schemas with their usage counts.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::Repository`] when a lookup
    /// fails.
    pub async fn catalog(&self) -> SchemaRegistryServiceResult<SchemaCatalog> {
        let schemas = self.repository.list_active().await?;
        let mut counted = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            let count = self.usage.count_schema_references(schema.uri()).await?;
            counted.push((schema, count));
        }
        Ok(SchemaCatalog::build(counted))
    }

    /// Validates a payload against the schema registered under `uri`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRegistryServiceError::UnknownUri`] when no schema is
    /// registered under the URI, or a domain or repository error for a
    /// malformed URI or failed lookup. Payload violations are returned in
    /// the report, not as an error.
    pub async fn validate_payload(
        &self,
        uri: &str,
        payload: &Map<String, Value>,
    ) -> SchemaRegistryServiceResult<ValidationReport> {
        let schema_uri = SchemaUri::new(uri)?;
        let schema = self
            .repository
            .find_by_uri(&schema_uri)
            .await?
            .ok_or_else(|| SchemaRegistryServiceError::UnknownUri(schema_uri.clone()))?;
        let report = schema.validate_extension_data(payload);
        if !report.is_valid() {
            debug!(
                uri = %schema.uri(),
                violations = report.len(),
                "extension payload failed schema validation"
            );
        }
        Ok(report)
    }

    async fn find_by_id_or_error(
        &self,
        id: SchemaId,
    ) -> SchemaRegistryServiceResult<SchemaDefinition> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| SchemaRepositoryError::NotFound(id).into())
    }
}
