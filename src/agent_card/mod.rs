//! Versioned A2A agent cards.
//!
//! An agent card describes one version of an agent inside a namespace: its
//! endpoint, transport, capabilities, skills, and the extension records that
//! attach domain data to it. Cards are checked leniently when stored and
//! strictly when exported as protocol documents.
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
