//! Repository port for agent card persistence.

use crate::agent_card::domain::{AgentCard, AgentCardId, AgentName, AgentVersion};
use crate::namespace::domain::NamespaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent card repository operations.
pub type AgentCardRepositoryResult<T> = Result<T, AgentCardRepositoryError>;

/// Criteria for listing cards. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Restrict to one namespace.
    pub namespace: Option<NamespaceId>,
    /// Case-insensitive substring of the agent name.
    pub name_contains: Option<String>,
    /// Only default versions.
    pub default_only: bool,
    /// Only active cards.
    pub active_only: bool,
}

impl CardFilter {
    /// Creates a filter matching every card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: NamespaceId) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Restricts to names containing `fragment`, ignoring case.
    #[must_use]
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }

    /// Restricts to default versions.
    #[must_use]
    pub const fn default_only(mut self) -> Self {
        self.default_only = true;
        self
    }

    /// Restricts to active cards.
    #[must_use]
    pub const fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Returns whether `card` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, card: &AgentCard) -> bool {
        let namespace_ok = self
            .namespace
            .as_ref()
            .is_none_or(|namespace| card.namespace() == namespace);
        let name_ok = self.name_contains.as_ref().is_none_or(|fragment| {
            card.name()
                .as_str()
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        });
        namespace_ok
            && name_ok
            && (!self.default_only || card.is_default_version())
            && (!self.active_only || card.is_active())
    }
}

/// Agent card persistence contract.
///
/// Extension records are stored together with their card; every write
/// replaces the full extension list.
#[async_trait]
pub trait AgentCardRepository: Send + Sync {
    /// Stores a new card.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardRepositoryError::DuplicateCard`] when the ID exists,
    /// [`AgentCardRepositoryError::DuplicateIdentity`] when the
    /// `(namespace, name, version)` triple is taken, or
    /// [`AgentCardRepositoryError::DuplicateDefaultVersion`] when another
    /// version already holds the default flag.
    async fn create(&self, card: &AgentCard) -> AgentCardRepositoryResult<()>;

    /// Persists changes to an existing card.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardRepositoryError::NotFound`] when the card does not
    /// exist, or [`AgentCardRepositoryError::DuplicateDefaultVersion`] when
    /// another version already holds the default flag.
    async fn update(&self, card: &AgentCard) -> AgentCardRepositoryResult<()>;

    /// Deletes a card and its extensions.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCardRepositoryError::NotFound`] when the card does not
    /// exist.
    async fn delete(&self, id: AgentCardId) -> AgentCardRepositoryResult<()>;

    /// Finds a card by identifier.
    async fn find_by_id(&self, id: AgentCardId) -> AgentCardRepositoryResult<Option<AgentCard>>;

    /// Finds a card by its `(namespace, name, version)` triple.
    async fn find_by_identity(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
        version: &AgentVersion,
    ) -> AgentCardRepositoryResult<Option<AgentCard>>;

    /// Finds the default version for `(namespace, name)`.
    async fn find_default_version(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
    ) -> AgentCardRepositoryResult<Option<AgentCard>>;

    /// Returns matching cards ordered by namespace, name, then version
    /// descending.
    async fn list(&self, filter: &CardFilter) -> AgentCardRepositoryResult<Vec<AgentCard>>;
}

/// Errors returned by agent card repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentCardRepositoryError {
    /// A card with the same identifier already exists.
    #[error("duplicate agent card identifier: {0}")]
    DuplicateCard(AgentCardId),

    /// A card with the same namespace, name, and version already exists.
    #[error("agent card '{namespace}/{name}' version '{version}' already exists")]
    DuplicateIdentity {
        /// Conflicting namespace.
        namespace: NamespaceId,
        /// Conflicting name.
        name: AgentName,
        /// Conflicting version.
        version: AgentVersion,
    },

    /// Another version of the agent is already the default.
    #[error("agent '{namespace}/{name}' already has a default version")]
    DuplicateDefaultVersion {
        /// Namespace of the agent.
        namespace: NamespaceId,
        /// Name of the agent.
        name: AgentName,
    },

    /// The card was not found.
    #[error("agent card not found: {0}")]
    NotFound(AgentCardId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentCardRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
