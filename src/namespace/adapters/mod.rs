//! Adapter implementations of the namespace ports.

pub mod memory;
pub mod postgres;
