//! `PostgreSQL` adapters for namespace persistence.

mod models;
mod repository;
mod schema;

pub use repository::{NamespacePgPool, PostgresNamespaceRepository};
