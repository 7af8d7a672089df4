//! Service layer for agent case management.

use crate::agent_card::{
    domain::AgentCardId,
    ports::{AgentCardRepository, AgentCardRepositoryError},
};
use crate::agent_case::{
    domain::{
        AgentCase, AgentCaseDomainError, AgentCaseId, CaseOutcome, CaseQuery, NewAgentCase,
        VersionSelector,
    },
    ports::{AgentCaseRepository, AgentCaseRepositoryError, CaseFilter},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating an agent case.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAgentCaseRequest {
    name: String,
    agent_card: Option<AgentCardId>,
    agent_version: String,
    is_ground_truth: bool,
    query: CaseQuery,
    outcome: CaseOutcome,
    route_to: String,
    score: Option<f64>,
    actor: Option<String>,
}

impl CreateAgentCaseRequest {
    /// Creates a request for an unassigned case that applies to every
    /// version.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent_card: None,
            agent_version: String::new(),
            is_ground_truth: false,
            query: CaseQuery::default(),
            outcome: CaseOutcome::default(),
            route_to: String::new(),
            score: None,
            actor: None,
        }
    }

    /// Binds the case to a card and version selector.
    #[must_use]
    pub fn for_card(mut self, card: AgentCardId, version: impl Into<String>) -> Self {
        self.agent_card = Some(card);
        self.agent_version = version.into();
        self
    }

    /// Marks the outcome as a reference answer.
    #[must_use]
    pub const fn ground_truth(mut self) -> Self {
        self.is_ground_truth = true;
        self
    }

    /// Sets the recorded question.
    #[must_use]
    pub fn with_query(mut self, query: CaseQuery) -> Self {
        self.query = query;
        self
    }

    /// Sets the recorded outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: CaseOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Sets the routing target.
    #[must_use]
    pub fn route_to(mut self, target: impl Into<String>) -> Self {
        self.route_to = target.into();
        self
    }

    /// Sets the evaluation score.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Records the creating user.
    #[must_use]
    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Assignment {
    Card(AgentCardId, String),
    Unassigned,
}

/// Changes to an existing case. Unset members are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateAgentCaseRequest {
    name: Option<String>,
    assignment: Option<Assignment>,
    is_ground_truth: Option<bool>,
    query: Option<CaseQuery>,
    outcome: Option<CaseOutcome>,
    route_to: Option<String>,
    score: Option<Option<f64>>,
    actor: Option<String>,
}

impl UpdateAgentCaseRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the case.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Binds the case to a card and version selector.
    #[must_use]
    pub fn assign_to(mut self, card: AgentCardId, version: impl Into<String>) -> Self {
        self.assignment = Some(Assignment::Card(card, version.into()));
        self
    }

    /// Clears the card binding.
    #[must_use]
    pub fn unassign(mut self) -> Self {
        self.assignment = Some(Assignment::Unassigned);
        self
    }

    /// Sets or clears the ground-truth flag.
    #[must_use]
    pub const fn with_ground_truth(mut self, is_ground_truth: bool) -> Self {
        self.is_ground_truth = Some(is_ground_truth);
        self
    }

    /// Replaces the recorded question.
    #[must_use]
    pub fn with_query(mut self, query: CaseQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Replaces the recorded outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: CaseOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Replaces the routing target.
    #[must_use]
    pub fn route_to(mut self, target: impl Into<String>) -> Self {
        self.route_to = Some(target.into());
        self
    }

    /// Sets the evaluation score.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(Some(score));
        self
    }

    /// Clears the evaluation score.
    #[must_use]
    pub const fn clear_score(mut self) -> Self {
        self.score = Some(None);
        self
    }

    /// Records the editing user.
    #[must_use]
    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Service-level errors for agent case operations.
#[derive(Debug, Error)]
pub enum AgentCaseServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentCaseDomainError),
    /// Case repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentCaseRepositoryError),
    /// Card lookup failed.
    #[error(transparent)]
    CardLookup(#[from] AgentCardRepositoryError),
    /// The case names a card that does not exist.
    #[error("agent card '{0}' does not exist")]
    UnknownCard(AgentCardId),
}

/// Result type for agent case service operations.
pub type AgentCaseServiceResult<T> = Result<T, AgentCaseServiceError>;

/// Agent case orchestration service.
#[derive(Clone)]
pub struct AgentCaseService<R, K, C>
where
    R: AgentCaseRepository,
    K: AgentCardRepository,
    C: Clock + Send + Sync,
{
    cases: Arc<R>,
    cards: Arc<K>,
    clock: Arc<C>,
}

impl<R, K, C> AgentCaseService<R, K, C>
where
    R: AgentCaseRepository,
    K: AgentCardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new agent case service.
    #[must_use]
    pub const fn new(cases: Arc<R>, cards: Arc<K>, clock: Arc<C>) -> Self {
        Self {
            cases,
            cards,
            clock,
        }
    }

    /// Records a case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Domain`] for an invalid name, query
    /// key, version selector, or score,
    /// [`AgentCaseServiceError::UnknownCard`] when the bound card is
    /// missing, or [`AgentCaseServiceError::Repository`] when persistence
    /// fails.
    pub async fn create(
        &self,
        request: CreateAgentCaseRequest,
    ) -> AgentCaseServiceResult<AgentCase> {
        let CreateAgentCaseRequest {
            name,
            agent_card,
            agent_version,
            is_ground_truth,
            query,
            outcome,
            route_to,
            score,
            actor,
        } = request;

        let selector = VersionSelector::new(agent_version).map_err(AgentCaseDomainError::from)?;
        if let Some(card) = agent_card {
            self.ensure_card(card).await?;
        }
        let case = AgentCase::new(
            NewAgentCase {
                name,
                agent_card,
                agent_version: selector,
                is_ground_truth,
                query,
                outcome,
                route_to,
                score,
                created_by: actor,
            },
            &*self.clock,
        )?;

        self.cases.create(&case).await?;
        info!(
            case_id = %case.id(),
            case = case.name(),
            ground_truth = case.is_ground_truth(),
            "created agent case"
        );
        Ok(case)
    }

    /// Applies changes to a case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Domain`] for an invalid change,
    /// [`AgentCaseServiceError::UnknownCard`] when assigning to a missing
    /// card, or [`AgentCaseServiceError::Repository`] when the case is not
    /// found.
    pub async fn update(
        &self,
        id: AgentCaseId,
        request: UpdateAgentCaseRequest,
    ) -> AgentCaseServiceResult<AgentCase> {
        let mut case = self.load(id).await?;
        let actor = request.actor.as_deref();
        let clock = &*self.clock;

        if let Some(name) = request.name {
            case.rename(name, actor, clock)?;
        }
        match request.assignment {
            Some(Assignment::Card(card, version)) => {
                let selector =
                    VersionSelector::new(version).map_err(AgentCaseDomainError::from)?;
                self.ensure_card(card).await?;
                case.assign(card, selector, actor, clock);
            }
            Some(Assignment::Unassigned) => case.unassign(actor, clock),
            None => {}
        }
        if let Some(is_ground_truth) = request.is_ground_truth {
            case.set_ground_truth(is_ground_truth, actor, clock);
        }
        if let Some(query) = request.query {
            case.replace_query(query, actor, clock)?;
        }
        if let Some(outcome) = request.outcome {
            case.replace_outcome(outcome, actor, clock);
        }
        if let Some(route_to) = request.route_to {
            case.set_route(route_to, actor, clock);
        }
        if let Some(score) = request.score {
            case.set_score(score, actor, clock)?;
        }

        self.cases.update(&case).await?;
        info!(case_id = %id, "updated agent case");
        Ok(case)
    }

    /// Finds a case by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Repository`] when the lookup fails.
    pub async fn find(&self, id: AgentCaseId) -> AgentCaseServiceResult<Option<AgentCase>> {
        Ok(self.cases.find_by_id(id).await?)
    }

    /// Lists matching cases, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &CaseFilter) -> AgentCaseServiceResult<Vec<AgentCase>> {
        Ok(self.cases.list(filter).await?)
    }

    /// Deletes a case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Repository`] when the case is not
    /// found or persistence fails.
    pub async fn delete(&self, id: AgentCaseId) -> AgentCaseServiceResult<()> {
        self.cases.delete(id).await?;
        info!(case_id = %id, "deleted agent case");
        Ok(())
    }

    /// Unbinds every case from `card`, typically after the card is deleted.
    ///
    /// Returns the number of cases released. Released cases keep their
    /// version selector and show up in unassigned listings.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseServiceError::Repository`] when persistence fails.
    pub async fn release_card(&self, card: AgentCardId) -> AgentCaseServiceResult<u64> {
        let bound = self.cases.list(&CaseFilter::new().for_card(card)).await?;
        let mut released = 0_u64;
        for mut case in bound {
            case.unassign(None, &*self.clock);
            self.cases.update(&case).await?;
            released += 1;
        }
        if released > 0 {
            info!(card_id = %card, cases = released, "released agent cases from card");
        }
        Ok(released)
    }

    async fn ensure_card(&self, card: AgentCardId) -> AgentCaseServiceResult<()> {
        self.cards
            .find_by_id(card)
            .await?
            .map(|_| ())
            .ok_or(AgentCaseServiceError::UnknownCard(card))
    }

    async fn load(&self, id: AgentCaseId) -> AgentCaseServiceResult<AgentCase> {
        self.cases
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentCaseRepositoryError::NotFound(id).into())
    }
}
