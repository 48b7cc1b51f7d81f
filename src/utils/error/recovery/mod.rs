//! Error recovery utilities
//!
//! Retry with exponential backoff, used both for in-process retries
//! (store writes) and for computing persisted retry schedules.

mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::RetryConfig;

#[cfg(test)]
mod tests;
