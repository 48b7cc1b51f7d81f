//! Health checking system

mod checker;
mod registry;
mod types;

#[cfg(test)]
mod tests;

pub use checker::HealthChecker;
pub use registry::{WorkerHandle, WorkerRegistry};
pub use types::{ComponentHealth, HealthStatus, WorkerState, WorkerStatus};
