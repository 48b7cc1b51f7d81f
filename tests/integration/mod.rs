//! Integration tests for predictive-alerts
//!
//! These tests drive the public API against a real in-memory store.

pub mod concurrency_tests;
pub mod config_tests;
pub mod pipeline_tests;
pub mod scenario_tests;
