//! Application services for agent card management.

mod cards;

pub use cards::{
    AgentCardService, AgentCardServiceError, AgentCardServiceResult, CreateAgentCardRequest,
};
