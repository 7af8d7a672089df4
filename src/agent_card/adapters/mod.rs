//! Adapter implementations of the agent card ports.

pub mod memory;
pub mod postgres;
