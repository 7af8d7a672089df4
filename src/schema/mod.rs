//! Extension schema registry.
//!
//! Operators describe the fields an agent card extension may carry; the
//! registry turns those field constraints into draft-07 JSON Schema documents
//! and validates extension payloads against them. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
