//! Domain model for agent cases.

mod case;
mod error;
mod ids;
mod selector;

pub use case::{AgentCase, CaseOutcome, CaseQuery, NewAgentCase, PersistedAgentCaseData};
pub use error::AgentCaseDomainError;
pub use ids::AgentCaseId;
pub use selector::VersionSelector;
