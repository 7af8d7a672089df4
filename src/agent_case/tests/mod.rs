//! Unit tests for the agent case module.

mod domain_tests;
