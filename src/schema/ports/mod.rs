//! Port contracts for extension schema persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the schema
//! registry service.

pub mod repository;
pub mod usage;

pub use repository::{SchemaRepository, SchemaRepositoryError, SchemaRepositoryResult};
pub use usage::SchemaUsage;
