//! Agent case aggregate root.

use super::{AgentCaseDomainError, AgentCaseId, VersionSelector};
use crate::agent_card::domain::AgentCardId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAX_CASE_NAME_LENGTH: usize = 255;
const MAX_QUERY_KEY_LENGTH: usize = 255;

/// The question a case records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseQuery {
    /// Stable key identifying the question across cases.
    pub key: String,
    /// Free-text description of the question.
    pub description: String,
    /// Structured query input.
    pub value: Value,
}

impl CaseQuery {
    /// Creates a query with a key and empty description and value.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the structured input.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    fn normalised(self) -> Result<Self, AgentCaseDomainError> {
        let key = self.key.trim();
        if key.chars().count() > MAX_QUERY_KEY_LENGTH {
            return Err(AgentCaseDomainError::QueryKeyTooLong(self.key));
        }
        Ok(Self {
            key: key.to_owned(),
            description: self.description.trim().to_owned(),
            value: self.value,
        })
    }
}

/// What the agent produced for a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Outcome category, such as `answer` or `error`.
    pub kind: String,
    /// Structured outcome payload.
    pub data: Value,
    /// Reviewer notes.
    pub notes: String,
}

impl CaseOutcome {
    /// Creates an outcome of the given category.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets the structured payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Sets the reviewer notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    fn normalised(self) -> Self {
        Self {
            kind: self.kind.trim().to_owned(),
            data: self.data,
            notes: self.notes.trim().to_owned(),
        }
    }
}

/// A recorded query with its outcome, optionally bound to an agent card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCase {
    id: AgentCaseId,
    name: String,
    agent_card: Option<AgentCardId>,
    agent_version: VersionSelector,
    is_ground_truth: bool,
    query: CaseQuery,
    outcome: CaseOutcome,
    route_to: String,
    score: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_by: Option<String>,
}

/// Parameter object for creating a case.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAgentCase {
    /// Case name.
    pub name: String,
    /// Bound agent card, if assigned.
    pub agent_card: Option<AgentCardId>,
    /// Versions of the bound agent the case applies to.
    pub agent_version: VersionSelector,
    /// Whether the outcome is a reference answer.
    pub is_ground_truth: bool,
    /// The recorded question.
    pub query: CaseQuery,
    /// The recorded outcome.
    pub outcome: CaseOutcome,
    /// Routing target for matching requests.
    pub route_to: String,
    /// Evaluation score.
    pub score: Option<f64>,
    /// Username of the creator.
    pub created_by: Option<String>,
}

/// Parameter object for reconstructing a persisted case.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAgentCaseData {
    /// Persisted identifier.
    pub id: AgentCaseId,
    /// Persisted name.
    pub name: String,
    /// Persisted card binding.
    pub agent_card: Option<AgentCardId>,
    /// Persisted version selector.
    pub agent_version: VersionSelector,
    /// Persisted ground-truth flag.
    pub is_ground_truth: bool,
    /// Persisted question.
    pub query: CaseQuery,
    /// Persisted outcome.
    pub outcome: CaseOutcome,
    /// Persisted routing target.
    pub route_to: String,
    /// Persisted score.
    pub score: Option<f64>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted creator.
    pub created_by: Option<String>,
    /// Persisted last editor.
    pub updated_by: Option<String>,
}

impl AgentCase {
    /// Creates a case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseDomainError`] for a blank or overlong name, an
    /// overlong query key, or a non-finite score.
    pub fn new(data: NewAgentCase, clock: &impl Clock) -> Result<Self, AgentCaseDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: AgentCaseId::new(),
            name: validate_name(data.name)?,
            agent_card: data.agent_card,
            agent_version: data.agent_version,
            is_ground_truth: data.is_ground_truth,
            query: data.query.normalised()?,
            outcome: data.outcome.normalised(),
            route_to: data.route_to.trim().to_owned(),
            score: validate_score(data.score)?,
            created_at: timestamp,
            updated_at: timestamp,
            updated_by: data.created_by.clone(),
            created_by: data.created_by,
        })
    }

    /// Reconstructs a case from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentCaseData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            agent_card: data.agent_card,
            agent_version: data.agent_version,
            is_ground_truth: data.is_ground_truth,
            query: data.query,
            outcome: data.outcome,
            route_to: data.route_to,
            score: data.score,
            created_at: data.created_at,
            updated_at: data.updated_at,
            created_by: data.created_by,
            updated_by: data.updated_by,
        }
    }

    /// Returns the case identifier.
    #[must_use]
    pub const fn id(&self) -> AgentCaseId {
        self.id
    }

    /// Returns the case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound agent card, if any.
    #[must_use]
    pub const fn agent_card(&self) -> Option<AgentCardId> {
        self.agent_card
    }

    /// Returns whether no agent card is bound.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        self.agent_card.is_none()
    }

    /// Returns the version selector.
    #[must_use]
    pub const fn agent_version(&self) -> &VersionSelector {
        &self.agent_version
    }

    /// Returns whether the outcome is a reference answer.
    #[must_use]
    pub const fn is_ground_truth(&self) -> bool {
        self.is_ground_truth
    }

    /// Returns the recorded question.
    #[must_use]
    pub const fn query(&self) -> &CaseQuery {
        &self.query
    }

    /// Returns the recorded outcome.
    #[must_use]
    pub const fn outcome(&self) -> &CaseOutcome {
        &self.outcome
    }

    /// Returns the routing target.
    #[must_use]
    pub fn route_to(&self) -> &str {
        &self.route_to
    }

    /// Returns the evaluation score.
    #[must_use]
    pub const fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the creator's username.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns the last editor's username.
    #[must_use]
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    /// Renames the case.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseDomainError::EmptyCaseName`] or
    /// [`AgentCaseDomainError::CaseNameTooLong`].
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        actor: Option<&str>,
        clock: &impl Clock,
    ) -> Result<(), AgentCaseDomainError> {
        self.name = validate_name(name.into())?;
        self.touch(actor, clock);
        Ok(())
    }

    /// Binds the case to a card and version selector.
    pub fn assign(
        &mut self,
        card: AgentCardId,
        version: VersionSelector,
        actor: Option<&str>,
        clock: &impl Clock,
    ) {
        self.agent_card = Some(card);
        self.agent_version = version;
        self.touch(actor, clock);
    }

    /// Clears the card binding. The version selector is kept.
    pub fn unassign(&mut self, actor: Option<&str>, clock: &impl Clock) {
        self.agent_card = None;
        self.touch(actor, clock);
    }

    /// Sets or clears the ground-truth flag.
    pub fn set_ground_truth(
        &mut self,
        is_ground_truth: bool,
        actor: Option<&str>,
        clock: &impl Clock,
    ) {
        self.is_ground_truth = is_ground_truth;
        self.touch(actor, clock);
    }

    /// Replaces the recorded question.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseDomainError::QueryKeyTooLong`].
    pub fn replace_query(
        &mut self,
        query: CaseQuery,
        actor: Option<&str>,
        clock: &impl Clock,
    ) -> Result<(), AgentCaseDomainError> {
        self.query = query.normalised()?;
        self.touch(actor, clock);
        Ok(())
    }

    /// Replaces the recorded outcome.
    pub fn replace_outcome(
        &mut self,
        outcome: CaseOutcome,
        actor: Option<&str>,
        clock: &impl Clock,
    ) {
        self.outcome = outcome.normalised();
        self.touch(actor, clock);
    }

    /// Replaces the routing target.
    pub fn set_route(
        &mut self,
        route_to: impl Into<String>,
        actor: Option<&str>,
        clock: &impl Clock,
    ) {
        self.route_to = route_to.into().trim().to_owned();
        self.touch(actor, clock);
    }

    /// Sets or clears the evaluation score.
    ///
    /// # Errors
    ///
    /// Returns [`AgentCaseDomainError::NonFiniteScore`].
    pub fn set_score(
        &mut self,
        score: Option<f64>,
        actor: Option<&str>,
        clock: &impl Clock,
    ) -> Result<(), AgentCaseDomainError> {
        self.score = validate_score(score)?;
        self.touch(actor, clock);
        Ok(())
    }

    fn touch(&mut self, actor: Option<&str>, clock: &impl Clock) {
        if let Some(user) = actor {
            self.updated_by = Some(user.to_owned());
        }
        self.updated_at = clock.utc();
    }
}

fn validate_name(raw: String) -> Result<String, AgentCaseDomainError> {
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(AgentCaseDomainError::EmptyCaseName);
    }
    if normalized.chars().count() > MAX_CASE_NAME_LENGTH {
        return Err(AgentCaseDomainError::CaseNameTooLong(raw));
    }
    Ok(normalized.to_owned())
}

fn validate_score(score: Option<f64>) -> Result<Option<f64>, AgentCaseDomainError> {
    match score {
        Some(value) if !value.is_finite() => Err(AgentCaseDomainError::NonFiniteScore(value)),
        valid => Ok(valid),
    }
}
