//! Core functionality for the alert engine
//!
//! Domain models and the workers that move alerts through their lifecycle.

pub mod inference;
pub mod ingest;
pub mod lifecycle;
pub mod maintenance;
pub mod models;
pub mod notifications;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;
