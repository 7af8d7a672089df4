//! `PostgreSQL` adapters for schema persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresSchemaRepository, SchemaPgPool};
