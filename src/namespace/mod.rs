//! Namespaces isolating agent cards per environment or team.
//!
//! Every agent card belongs to exactly one namespace (for example `dev`,
//! `prod`, or `lab-instruments`). A namespace cannot be deleted while it
//! still holds cards.
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
