//! In-memory repository for extension schema definitions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::schema::{
    domain::{SchemaDefinition, SchemaId, SchemaType, SchemaUri, SchemaVersion},
    ports::{SchemaRepository, SchemaRepositoryError, SchemaRepositoryResult},
};

/// Thread-safe in-memory schema repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaRepository {
    state: Arc<RwLock<InMemorySchemaState>>,
}

#[derive(Debug, Default)]
struct InMemorySchemaState {
    schemas: HashMap<SchemaId, SchemaDefinition>,
    uri_index: HashMap<SchemaUri, SchemaId>,
    identity_index: HashMap<(SchemaType, SchemaVersion), SchemaId>,
}

impl InMemorySchemaRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut schemas: Vec<SchemaDefinition>) -> Vec<SchemaDefinition> {
        schemas.sort_by(|a, b| {
            a.schema_type()
                .cmp(b.schema_type())
                .then_with(|| a.version().cmp(b.version()))
        });
        schemas
    }
}

fn lock_error(err: impl ToString) -> SchemaRepositoryError {
    SchemaRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn identity_of(schema: &SchemaDefinition) -> (SchemaType, SchemaVersion) {
    (schema.schema_type().clone(), schema.version().clone())
}

#[async_trait]
impl SchemaRepository for InMemorySchemaRepository {
    async fn create(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if state.schemas.contains_key(&schema.id()) {
            return Err(SchemaRepositoryError::DuplicateSchema(schema.id()));
        }
        if state.uri_index.contains_key(schema.uri()) {
            return Err(SchemaRepositoryError::DuplicateUri(schema.uri().clone()));
        }
        let identity = identity_of(schema);
        if state.identity_index.contains_key(&identity) {
            return Err(SchemaRepositoryError::DuplicateTypeVersion {
                schema_type: identity.0,
                version: identity.1,
            });
        }

        state.uri_index.insert(schema.uri().clone(), schema.id());
        state.identity_index.insert(identity, schema.id());
        state.schemas.insert(schema.id(), schema.clone());
        Ok(())
    }

    async fn update(&self, schema: &SchemaDefinition) -> SchemaRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        let previous = state
            .schemas
            .get(&schema.id())
            .ok_or(SchemaRepositoryError::NotFound(schema.id()))?;
        let old_uri = previous.uri().clone();
        let old_identity = identity_of(previous);

        if *schema.uri() != old_uri {
            if let Some(&indexed_id) = state.uri_index.get(schema.uri())
                && indexed_id != schema.id()
            {
                return Err(SchemaRepositoryError::DuplicateUri(schema.uri().clone()));
            }
            state.uri_index.remove(&old_uri);
            state.uri_index.insert(schema.uri().clone(), schema.id());
        }

        let identity = identity_of(schema);
        if identity != old_identity {
            if let Some(&indexed_id) = state.identity_index.get(&identity)
                && indexed_id != schema.id()
            {
                return Err(SchemaRepositoryError::DuplicateTypeVersion {
                    schema_type: identity.0,
                    version: identity.1,
                });
            }
            state.identity_index.remove(&old_identity);
            state.identity_index.insert(identity, schema.id());
        }

        state.schemas.insert(schema.id(), schema.clone());
        Ok(())
    }

    async fn delete(&self, id: SchemaId) -> SchemaRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let removed = state
            .schemas
            .remove(&id)
            .ok_or(SchemaRepositoryError::NotFound(id))?;
        state.uri_index.remove(removed.uri());
        state.identity_index.remove(&identity_of(&removed));
        Ok(())
    }

    async fn find_by_id(&self, id: SchemaId) -> SchemaRepositoryResult<Option<SchemaDefinition>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.schemas.get(&id).cloned())
    }

    async fn find_by_uri(
        &self,
        uri: &SchemaUri,
    ) -> SchemaRepositoryResult<Option<SchemaDefinition>> {
        let state = self.state.read().map_err(lock_error)?;
        let schema = state
            .uri_index
            .get(uri)
            .and_then(|id| state.schemas.get(id))
            .cloned();
        Ok(schema)
    }

    async fn list_all(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(Self::sorted(state.schemas.values().cloned().collect()))
    }

    async fn list_active(&self) -> SchemaRepositoryResult<Vec<SchemaDefinition>> {
        let state = self.state.read().map_err(lock_error)?;
        let active = state
            .schemas
            .values()
            .filter(|schema| schema.is_active())
            .cloned()
            .collect();
        Ok(Self::sorted(active))
    }
}
