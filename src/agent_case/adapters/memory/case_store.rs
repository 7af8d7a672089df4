//! In-memory repository for agent cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::agent_case::{
    domain::{AgentCase, AgentCaseId},
    ports::{AgentCaseRepository, AgentCaseRepositoryError, AgentCaseRepositoryResult, CaseFilter},
};

/// Thread-safe in-memory agent case repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentCaseRepository {
    state: Arc<RwLock<HashMap<AgentCaseId, AgentCase>>>,
}

impl InMemoryAgentCaseRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AgentCaseRepositoryError {
    AgentCaseRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AgentCaseRepository for InMemoryAgentCaseRepository {
    async fn create(&self, case: &AgentCase) -> AgentCaseRepositoryResult<()> {
        let mut cases = self.state.write().map_err(lock_error)?;
        if cases.contains_key(&case.id()) {
            return Err(AgentCaseRepositoryError::DuplicateCase(case.id()));
        }
        cases.insert(case.id(), case.clone());
        Ok(())
    }

    async fn update(&self, case: &AgentCase) -> AgentCaseRepositoryResult<()> {
        let mut cases = self.state.write().map_err(lock_error)?;
        let slot = cases
            .get_mut(&case.id())
            .ok_or(AgentCaseRepositoryError::NotFound(case.id()))?;
        *slot = case.clone();
        Ok(())
    }

    async fn delete(&self, id: AgentCaseId) -> AgentCaseRepositoryResult<()> {
        let mut cases = self.state.write().map_err(lock_error)?;
        cases
            .remove(&id)
            .map(|_| ())
            .ok_or(AgentCaseRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: AgentCaseId) -> AgentCaseRepositoryResult<Option<AgentCase>> {
        let cases = self.state.read().map_err(lock_error)?;
        Ok(cases.get(&id).cloned())
    }

    async fn list(&self, filter: &CaseFilter) -> AgentCaseRepositoryResult<Vec<AgentCase>> {
        let cases = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<AgentCase> = cases
            .values()
            .filter(|case| filter.matches(case))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(matching)
    }
}
