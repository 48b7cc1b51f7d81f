//! Error handling utilities
//!
//! Engine error type, HTTP error mapping, and retry/backoff policy.

pub mod error;
pub mod recovery;

pub use error::*;
pub use recovery::*;
