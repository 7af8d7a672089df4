//! Adapter implementations of the schema ports.

pub mod memory;
pub mod postgres;
