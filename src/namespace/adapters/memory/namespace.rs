//! In-memory repository for namespaces.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::namespace::{
    domain::{Namespace, NamespaceId},
    ports::{NamespaceRepository, NamespaceRepositoryError, NamespaceRepositoryResult},
};

/// Thread-safe in-memory namespace repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNamespaceRepository {
    namespaces: Arc<RwLock<BTreeMap<NamespaceId, Namespace>>>,
}

impl InMemoryNamespaceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> NamespaceRepositoryError {
    NamespaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl NamespaceRepository for InMemoryNamespaceRepository {
    async fn create(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()> {
        let mut namespaces = self.namespaces.write().map_err(lock_error)?;
        if namespaces.contains_key(namespace.id()) {
            return Err(NamespaceRepositoryError::DuplicateNamespace(
                namespace.id().clone(),
            ));
        }
        namespaces.insert(namespace.id().clone(), namespace.clone());
        Ok(())
    }

    async fn update(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()> {
        let mut namespaces = self.namespaces.write().map_err(lock_error)?;
        let slot = namespaces
            .get_mut(namespace.id())
            .ok_or_else(|| NamespaceRepositoryError::NotFound(namespace.id().clone()))?;
        *slot = namespace.clone();
        Ok(())
    }

    async fn delete(&self, id: &NamespaceId) -> NamespaceRepositoryResult<()> {
        let mut namespaces = self.namespaces.write().map_err(lock_error)?;
        namespaces
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| NamespaceRepositoryError::NotFound(id.clone()))
    }

    async fn find_by_id(&self, id: &NamespaceId) -> NamespaceRepositoryResult<Option<Namespace>> {
        let namespaces = self.namespaces.read().map_err(lock_error)?;
        Ok(namespaces.get(id).cloned())
    }

    async fn list_all(&self) -> NamespaceRepositoryResult<Vec<Namespace>> {
        let namespaces = self.namespaces.read().map_err(lock_error)?;
        Ok(namespaces.values().cloned().collect())
    }
}
