//! Health checking types

use serde::Serialize;

/// Lifecycle of a background worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Starting,
    Running,
    /// Stopped on a fatal error
    Failed(String),
    /// Stopped on shutdown
    Stopped,
}

impl WorkerState {
    pub fn is_failed(&self) -> bool {
        matches!(self, WorkerState::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStatus {
    pub name: String,
    pub state: WorkerState,
    pub since: chrono::DateTime<chrono::Utc>,
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub healthy: bool,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Readiness answer
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub ready: bool,
    pub database: ComponentHealth,
    pub workers: Vec<WorkerStatus>,
    /// Names of workers that stopped on a fatal error
    pub failed_workers: Vec<String>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}
