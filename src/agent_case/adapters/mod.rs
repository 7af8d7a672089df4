//! Adapter implementations of the agent case ports.

pub mod memory;
