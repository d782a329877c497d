//! Integration tests for agency-access
//!
//! These tests drive the public API against the in-memory platform.

pub mod access_tests;
pub mod config_tests;
pub mod provisioning_tests;
