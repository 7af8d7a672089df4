//! Unit tests for the namespace module.

mod service_tests;
