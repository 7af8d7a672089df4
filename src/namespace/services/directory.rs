//! Service layer for namespace management.

use crate::namespace::{
    domain::{Namespace, NamespaceDomainError, NamespaceId},
    ports::{NamespaceRepository, NamespaceRepositoryError, NamespaceUsage},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNamespaceRequest {
    id: String,
    name: String,
    description: String,
}

impl CreateNamespaceRequest {
    /// Creates a request with the identifier and display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Changes to an existing namespace. Unset members are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateNamespaceRequest {
    name: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}

impl UpdateNamespaceRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the namespace.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enables or disables the namespace.
    #[must_use]
    pub const fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Service-level errors for namespace operations.
#[derive(Debug, Error)]
pub enum NamespaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] NamespaceDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] NamespaceRepositoryError),
    /// The namespace still holds agent cards.
    #[error(
        "cannot delete namespace '{namespace}': it contains {count} agent card(s); \
         delete or move them first"
    )]
    InUse {
        /// The namespace being deleted.
        namespace: NamespaceId,
        /// Number of agent cards it holds.
        count: u64,
    },
}

/// Result type for namespace service operations.
pub type NamespaceServiceResult<T> = Result<T, NamespaceServiceError>;

/// Namespace orchestration service.
#[derive(Clone)]
pub struct NamespaceService<R, U, C>
where
    R: NamespaceRepository,
    U: NamespaceUsage,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    usage: Arc<U>,
    clock: Arc<C>,
}

impl<R, U, C> NamespaceService<R, U, C>
where
    R: NamespaceRepository,
    U: NamespaceUsage,
    C: Clock + Send + Sync,
{
    /// Creates a new namespace service.
    #[must_use]
    pub const fn new(repository: Arc<R>, usage: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            repository,
            usage,
            clock,
        }
    }

    /// Creates a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::Domain`] for an invalid identifier or
    /// name, or [`NamespaceServiceError::Repository`] when the identifier is
    /// taken.
    pub async fn create(
        &self,
        request: CreateNamespaceRequest,
    ) -> NamespaceServiceResult<Namespace> {
        let CreateNamespaceRequest {
            id: raw_id,
            name,
            description,
        } = request;
        let id = NamespaceId::new(raw_id)?;
        let namespace = Namespace::new(id, name, &*self.clock)?.with_description(description);
        self.repository.create(&namespace).await?;
        info!(namespace = %namespace.id(), "created namespace");
        Ok(namespace)
    }

    /// Applies changes to a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::Domain`] for an invalid name, or
    /// [`NamespaceServiceError::Repository`] when the namespace is not found.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateNamespaceRequest,
    ) -> NamespaceServiceResult<Namespace> {
        let namespace_id = NamespaceId::new(id)?;
        let mut namespace = self.find_or_error(&namespace_id).await?;
        let clock = &*self.clock;
        if let Some(name) = request.name {
            namespace.rename(name, clock)?;
        }
        if let Some(description) = request.description {
            namespace.set_description(description, clock);
        }
        match request.is_active {
            Some(true) => namespace.activate(clock),
            Some(false) => namespace.deactivate(clock),
            None => {}
        }
        self.repository.update(&namespace).await?;
        info!(namespace = %namespace_id, "updated namespace");
        Ok(namespace)
    }

    /// Finds a namespace by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::Domain`] for a malformed identifier,
    /// or [`NamespaceServiceError::Repository`] when the lookup fails.
    pub async fn find(&self, id: &str) -> NamespaceServiceResult<Option<Namespace>> {
        let namespace_id = NamespaceId::new(id)?;
        Ok(self.repository.find_by_id(&namespace_id).await?)
    }

    /// Returns every namespace ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::Repository`] when the lookup fails.
    pub async fn list(&self) -> NamespaceServiceResult<Vec<Namespace>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns the number of agent cards held by a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::Domain`] for a malformed identifier,
    /// or [`NamespaceServiceError::Repository`] when the lookup fails.
    pub async fn card_count(&self, id: &str) -> NamespaceServiceResult<u64> {
        let namespace_id = NamespaceId::new(id)?;
        Ok(self.usage.count_cards_in_namespace(&namespace_id).await?)
    }

    /// Deletes an empty namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceServiceError::InUse`] with the card count while the
    /// namespace holds cards, or [`NamespaceServiceError::Repository`] when
    /// the namespace is not found or persistence fails.
    pub async fn delete(&self, id: &str) -> NamespaceServiceResult<()> {
        let namespace_id = NamespaceId::new(id)?;
        let count = self.usage.count_cards_in_namespace(&namespace_id).await?;
        if count > 0 {
            warn!(
                namespace = %namespace_id,
                cards = count,
                "refusing to delete non-empty namespace"
            );
            return Err(NamespaceServiceError::InUse {
                namespace: namespace_id,
                count,
            });
        }
        self.repository.delete(&namespace_id).await?;
        info!(namespace = %namespace_id, "deleted namespace");
        Ok(())
    }

    async fn find_or_error(&self, id: &NamespaceId) -> NamespaceServiceResult<Namespace> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| NamespaceRepositoryError::NotFound(id.clone()).into())
    }
}
