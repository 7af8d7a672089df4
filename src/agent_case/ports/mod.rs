//! Port contracts for agent case persistence.

pub mod repository;

pub use repository::{
    AgentCaseRepository, AgentCaseRepositoryError, AgentCaseRepositoryResult, CaseFilter,
};
