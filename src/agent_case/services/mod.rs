//! Application services for agent case management.

mod cases;

pub use cases::{
    AgentCaseService, AgentCaseServiceError, AgentCaseServiceResult, CreateAgentCaseRequest,
    UpdateAgentCaseRequest,
};
