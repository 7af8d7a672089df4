//! Port contracts for namespace persistence.

pub mod repository;
pub mod usage;

pub use repository::{NamespaceRepository, NamespaceRepositoryError, NamespaceRepositoryResult};
pub use usage::NamespaceUsage;
