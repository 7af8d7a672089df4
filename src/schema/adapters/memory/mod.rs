//! In-memory adapters for schema persistence.

mod schema_registry;

pub use schema_registry::InMemorySchemaRepository;
