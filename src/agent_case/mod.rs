//! Agent cases: recorded queries and their expected outcomes.
//!
//! A case captures one question put to an agent, what the agent produced,
//! and where the request should be routed. Cases may be bound to an agent
//! card and a version selector (`*`, `latest`, or an exact version), or
//! left unassigned until someone triages them. Ground-truth cases serve as
//! reference answers when evaluating agents.
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
