//! Error handling for the alert engine
//!
//! This module defines all error types used throughout the engine.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{EngineError, Result};
