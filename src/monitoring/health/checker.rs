//! Readiness checks

use super::registry::WorkerRegistry;
use super::types::{ComponentHealth, HealthStatus};
use crate::storage::StorageLayer;
use std::time::Instant;
use tracing::debug;

/// Combines a store ping with the worker registry
#[derive(Debug, Clone)]
pub struct HealthChecker {
    storage: StorageLayer,
    workers: WorkerRegistry,
}

impl HealthChecker {
    pub fn new(storage: StorageLayer, workers: WorkerRegistry) -> Self {
        Self { storage, workers }
    }

    pub fn workers(&self) -> &WorkerRegistry {
        &self.workers
    }

    pub async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();
        let result = self.storage.db().health_check().await;
        ComponentHealth {
            name: "database".to_string(),
            healthy: result.is_ok(),
            response_time_ms: start.elapsed().as_millis() as u64,
            error: result.err().map(|e| e.to_string()),
        }
    }

    /// Ready when the store answers and every worker is running
    pub async fn check_all(&self) -> HealthStatus {
        debug!("Running readiness check");
        let database = self.check_database().await;
        let failed_workers = self.workers.failed();
        HealthStatus {
            ready: database.healthy && self.workers.all_running(),
            database,
            workers: self.workers.snapshot(),
            failed_workers,
            checked_at: chrono::Utc::now(),
        }
    }
}
