//! Repository port for namespace persistence.

use crate::namespace::domain::{Namespace, NamespaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for namespace repository operations.
pub type NamespaceRepositoryResult<T> = Result<T, NamespaceRepositoryError>;

/// Namespace persistence contract.
#[async_trait]
pub trait NamespaceRepository: Send + Sync {
    /// Stores a new namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceRepositoryError::DuplicateNamespace`] when the
    /// identifier is taken.
    async fn create(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()>;

    /// Persists changes to an existing namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceRepositoryError::NotFound`] when the namespace does
    /// not exist.
    async fn update(&self, namespace: &Namespace) -> NamespaceRepositoryResult<()>;

    /// Deletes a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceRepositoryError::NotFound`] when the namespace does
    /// not exist.
    async fn delete(&self, id: &NamespaceId) -> NamespaceRepositoryResult<()>;

    /// Finds a namespace by identifier.
    async fn find_by_id(&self, id: &NamespaceId) -> NamespaceRepositoryResult<Option<Namespace>>;

    /// Returns every namespace ordered by identifier.
    async fn list_all(&self) -> NamespaceRepositoryResult<Vec<Namespace>>;
}

/// Errors returned by namespace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NamespaceRepositoryError {
    /// A namespace with the same identifier already exists.
    #[error("namespace already exists: {0}")]
    DuplicateNamespace(NamespaceId),

    /// The namespace was not found.
    #[error("namespace not found: {0}")]
    NotFound(NamespaceId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NamespaceRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
