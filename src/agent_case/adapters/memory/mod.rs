//! In-memory adapters for agent case persistence.

mod case_store;

pub use case_store::InMemoryAgentCaseRepository;
