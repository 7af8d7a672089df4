//! Repository port for extension schema persistence.

use crate::schema::domain::{SchemaDefinition, SchemaId, SchemaType, SchemaUri, SchemaVersion};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for schema repository operations.
pub type SchemaRepositoryResult<T> = Result<T, SchemaRepositoryError>;

/// Schema definition persistence contract.
///
/// Fields are stored together with their schema; every write replaces the
/// full field list.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Stores a new schema definition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRepositoryError::DuplicateSchema`] when the ID exists,
    /// [`SchemaRepositoryError::DuplicateUri`] when the URI is taken, or
    /// [`SchemaRepositoryError::DuplicateTypeVersion`] when the
    /// `(type, version)` pair is taken.
    async fn create(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()>;

    /// Persists metadata and field changes of an existing schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRepositoryError::NotFound`] when the schema does not
    /// exist.
    async fn update(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()>;

    /// Deletes a schema and its fields.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaRepositoryError::NotFound`] when the schema does not
    /// exist.
    async fn delete(&self, id: SchemaId) -> SchemaRepositoryResult<()>;

    /// Finds a schema by identifier.
    async fn find_by_id(&self, id: SchemaId) -> SchemaRepositoryResult<Option<SchemaDefinition>>;

    /// Finds a schema by URI.
    async fn find_by_uri(&self, uri: &SchemaUri)
    -> SchemaRepositoryResult<Option<SchemaDefinition>>;

    /// Returns every schema ordered by type tag, then version.
    async fn list_all(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>>;

    /// Returns active schemas ordered by type tag, then version.
    async fn list_active(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>>;
}

/// Errors returned by schema repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SchemaRepositoryError {
    /// A schema with the same identifier already exists.
    #[error("duplicate schema identifier: {0}")]
    DuplicateSchema(SchemaId),

    /// A schema with the same URI already exists.
    #[error("a schema with URI '{0}' already exists")]
    DuplicateUri(SchemaUri),

    /// A schema with the same type tag and version already exists.
    #[error("a schema of type '{schema_type}' with version '{version}' already exists")]
    DuplicateTypeVersion {
        /// Conflicting type tag.
        schema_type: SchemaType,
        /// Conflicting version.
        version: SchemaVersion,
    },

    /// The schema was not found.
    #[error("schema not found: {0}")]
    NotFound(SchemaId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SchemaRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
