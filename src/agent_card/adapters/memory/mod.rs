//! In-memory adapters for agent card persistence.

mod card_store;

pub use card_store::InMemoryAgentCardRepository;
