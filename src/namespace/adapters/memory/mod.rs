//! In-memory adapters for namespace persistence.

mod namespace;

pub use namespace::InMemoryNamespaceRepository;
