//! Agentcards: a registry for agent cards and their extension schemas.
//!
//! Agent cards describe what an agent offers and how to reach it. The
//! registry stores them per namespace and version, binds domain extensions
//! to registered field schemas, and exports protocol-compliant documents.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`schema`]: Extension schemas, field constraints, and the catalog
//! - [`namespace`]: Namespaces that partition agent cards
//! - [`agent_card`]: Agent cards, extensions, import, and export
//! - [`agent_case`]: Recorded queries and outcomes bound to agent cards
//! - [`validation`]: Aggregated validation reports
//! - [`config`]: Registry configuration

pub mod agent_card;
pub mod agent_case;
pub mod config;
pub mod namespace;
pub mod schema;
pub mod validation;
