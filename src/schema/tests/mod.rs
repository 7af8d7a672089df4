//! Unit tests for the schema module.

mod domain_tests;
