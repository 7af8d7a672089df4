//! Repository port for agent case persistence.

use crate::agent_card::domain::AgentCardId;
use crate::agent_case::domain::{AgentCase, AgentCaseId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent case repository operations.
pub type AgentCaseRepositoryResult<T> = Result<T, AgentCaseRepositoryError>;

/// Criteria for listing cases. Unset criteria match everything.
///
/// The version criterion only applies together with a card: it keeps
/// cases whose selector is `*`, blank, `latest`, or exactly that version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// Restrict to cases bound to one card.
    pub agent_card: Option<AgentCardId>,
    /// Agent version the cases must apply to.
    pub version: Option<String>,
    /// Only ground-truth cases.
    pub ground_truth_only: bool,
    /// Case-insensitive substring of the query key.
    pub query_key_contains: Option<String>,
    /// Only cases without a bound card.
    pub unassigned_only: bool,
}

impl CaseFilter {
    /// Creates a filter matching every case.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to cases bound to `card`.
    #[must_use]
    pub const fn for_card(mut self, card: AgentCardId) -> Self {
        self.agent_card = Some(card);
        self
    }

    /// Restricts to cases applying to `version` of the filtered card.
    #[must_use]
    pub fn at_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Restricts to ground-truth cases.
    #[must_use]
    pub const fn ground_truth_only(mut self) -> Self {
        self.ground_truth_only = true;
        self
    }

    /// Restricts to query keys containing `fragment`, ignoring case.
    #[must_use]
    pub fn query_key_contains(mut self, fragment: impl Into<String>) -> Self {
        self.query_key_contains = Some(fragment.into());
        self
    }

    /// Restricts to cases without a bound card.
    #[must_use]
    pub const fn unassigned_only(mut self) -> Self {
        self.unassigned_only = true;
        self
    }

    /// Returns whether `case` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, case: &AgentCase) -> bool {
        let card_ok = self
            .agent_card
            .is_none_or(|card| case.agent_card() == Some(card));
        let version_ok = match (self.agent_card, self.version.as_deref()) {
            (Some(_), Some(version)) if !version.trim().is_empty() => {
                case.agent_version().admits(version)
            }
            _ => true,
        };
        let key_ok = self.query_key_contains.as_ref().is_none_or(|fragment| {
            case.query()
                .key
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        });
        card_ok
            && version_ok
            && key_ok
            && (!self.ground_truth_only || case.is_ground_truth())
            && (!self.unassigned_only || case.is_unassigned())
    }
}

/// Agent case persistence contract.
#[async_trait]
pub trait AgentCaseRepository: Send + Sync {
    /// Stores a new case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseRepositoryError::DuplicateCase`] when the ID
    /// exists.
    async fn create(&self, case: &AgentCase) -> AgentCaseRepositoryResult<()>;

    /// Persists changes to an existing case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseRepositoryError::NotFound`] when the case does not
    /// exist.
    async fn update(&self, case: &AgentCase) -> AgentCaseRepositoryResult<()>;

    /// Deletes a case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseRepositoryError::NotFound`] when the case does not
    /// exist.
    async fn delete(&self, id: AgentCaseId) -> AgentCaseRepositoryResult<()>;

    /// Finds a case by identifier.
    async fn find_by_id(&self, id: AgentCaseId) -> AgentCaseRepositoryResult<Option<AgentCase>>;

    /// Returns matching cases, newest first.
    async fn list(&self, filter: &CaseFilter) -> AgentCaseRepositoryResult<Vec<AgentCase>>;
}

/// Errors returned by agent case repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentCaseRepositoryError {
    /// A case with the same identifier already exists.
    #[error("duplicate agent case identifier: {0}")]
    DuplicateCase(AgentCaseId),

    /// The case was not found.
    #[error("agent case not found: {0}")]
    NotFound(AgentCaseId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentCaseRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
