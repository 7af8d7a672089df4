//! `PostgreSQL` adapters for agent card persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CardPgPool, PostgresAgentCardRepository};
