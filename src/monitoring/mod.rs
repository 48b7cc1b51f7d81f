//! Worker and store health
//!
//! Workers report their state to a shared registry; the HTTP surface turns
//! the registry plus a database ping into liveness and readiness answers.

pub mod health;

pub use health::{
    ComponentHealth, HealthChecker, HealthStatus, WorkerHandle, WorkerRegistry, WorkerState,
    WorkerStatus,
};
