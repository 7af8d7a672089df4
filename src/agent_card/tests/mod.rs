//! Unit tests for the agent card module.

mod export_tests;
mod extension_tests;
