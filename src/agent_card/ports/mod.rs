//! Port contracts for agent card persistence.

pub mod repository;

pub use repository::{
    AgentCardRepository, AgentCardRepositoryError, AgentCardRepositoryResult, CardFilter,
};
