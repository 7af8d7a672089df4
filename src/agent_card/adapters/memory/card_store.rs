//! In-memory repository for agent cards.
//!
//! Besides the card port, the store answers the usage questions asked by
//! the schema registry and the namespace directory, since it owns the data
//! those guards count.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent_card::{
    domain::{AgentCard, AgentCardId, AgentName, AgentVersion},
    ports::{AgentCardRepository, AgentCardRepositoryError, AgentCardRepositoryResult, CardFilter},
};
use crate::namespace::{
    domain::NamespaceId,
    ports::{NamespaceRepositoryError, NamespaceRepositoryResult, NamespaceUsage},
};
use crate::schema::{
    domain::SchemaUri,
    ports::{SchemaRepositoryError, SchemaRepositoryResult, SchemaUsage},
};

/// Thread-safe in-memory agent card repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentCardRepository {
    state: Arc<RwLock<HashMap<AgentCardId, AgentCard>>>,
}

impl InMemoryAgentCardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut cards: Vec<AgentCard>) -> Vec<AgentCard> {
        cards.sort_by(|a, b| {
            a.namespace()
                .cmp(b.namespace())
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| b.version().cmp(a.version()))
        });
        cards
    }
}

fn lock_error(err: impl ToString) -> AgentCardRepositoryError {
    AgentCardRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Rejects `card` when another stored card shares its identity triple or
/// its default-version slot.
fn check_conflicts(
    cards: &HashMap<AgentCardId, AgentCard>,
    card: &AgentCard,
) -> AgentCardRepositoryResult<()> {
    let others = cards.values().filter(|other| other.id() != card.id());
    for other in others.filter(|other| other.is_sibling_of(card)) {
        if other.version() == card.version() {
            return Err(AgentCardRepositoryError::DuplicateIdentity {
                namespace: card.namespace().clone(),
                name: card.name().clone(),
                version: card.version().clone(),
            });
        }
        if card.is_default_version() && other.is_default_version() {
            return Err(AgentCardRepositoryError::DuplicateDefaultVersion {
                namespace: card.namespace().clone(),
                name: card.name().clone(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl AgentCardRepository for InMemoryAgentCardRepository {
    async fn create(&self, card: &AgentCard) -> AgentCardRepositoryResult<()> {
        let mut cards = self.state.write().map_err(lock_error)?;
        if cards.contains_key(&card.id()) {
            return Err(AgentCardRepositoryError::DuplicateCard(card.id()));
        }
        check_conflicts(&cards, card)?;
        cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn update(&self, card: &AgentCard) -> AgentCardRepositoryResult<()> {
        let mut cards = self.state.write().map_err(lock_error)?;
        if !cards.contains_key(&card.id()) {
            return Err(AgentCardRepositoryError::NotFound(card.id()));
        }
        check_conflicts(&cards, card)?;
        cards.insert(card.id(), card.clone());
        Ok(())
    }

    async fn delete(&self, id: AgentCardId) -> AgentCardRepositoryResult<()> {
        let mut cards = self.state.write().map_err(lock_error)?;
        cards
            .remove(&id)
            .map(|_| ())
            .ok_or(AgentCardRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: AgentCardId) -> AgentCardRepositoryResult<Option<AgentCard>> {
        let cards = self.state.read().map_err(lock_error)?;
        Ok(cards.get(&id).cloned())
    }

    async fn find_by_identity(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
        version: &AgentVersion,
    ) -> AgentCardRepositoryResult<Option<AgentCard>> {
        let cards = self.state.read().map_err(lock_error)?;
        Ok(cards
            .values()
            .find(|card| {
                card.namespace() == namespace && card.name() == name && card.version() == version
            })
            .cloned())
    }

    async fn find_default_version(
        &self,
        namespace: &NamespaceId,
        name: &AgentName,
    ) -> AgentCardRepositoryResult<Option<AgentCard>> {
        let cards = self.state.read().map_err(lock_error)?;
        Ok(cards
            .values()
            .find(|card| {
                card.is_default_version() && card.namespace() == namespace && card.name() == name
            })
            .cloned())
    }

    async fn list(&self, filter: &CardFilter) -> AgentCardRepositoryResult<Vec<AgentCard>> {
        let cards = self.state.read().map_err(lock_error)?;
        let matching = cards
            .values()
            .filter(|card| filter.matches(card))
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }
}

#[async_trait]
impl SchemaUsage for InMemoryAgentCardRepository {
    async fn count_schema_references(&self, uri: &SchemaUri) -> SchemaRepositoryResult<u64> {
        let cards = self.state.read().map_err(|err| {
            SchemaRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let count = cards
            .values()
            .flat_map(AgentCard::extensions)
            .filter(|record| record.uri() == uri.as_str())
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl NamespaceUsage for InMemoryAgentCardRepository {
    async fn count_cards_in_namespace(
        &self,
        namespace: &NamespaceId,
    ) -> NamespaceRepositoryResult<u64> {
        let cards = self.state.read().map_err(|err| {
            NamespaceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let count = cards
            .values()
            .filter(|card| card.namespace() == namespace)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
