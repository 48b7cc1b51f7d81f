//! Worker state registry

use super::types::{WorkerState, WorkerStatus};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

/// Shared view of every background worker's state
#[derive(Debug, Clone, Default)]
pub struct WorkerRegistry {
    workers: Arc<RwLock<BTreeMap<String, WorkerStatus>>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worker in `Starting` state and return its handle
    pub fn register(&self, name: &str) -> WorkerHandle {
        self.set(name, WorkerState::Starting);
        WorkerHandle {
            name: name.to_string(),
            registry: self.clone(),
        }
    }

    pub fn snapshot(&self) -> Vec<WorkerStatus> {
        self.workers.read().values().cloned().collect()
    }

    pub fn state(&self, name: &str) -> Option<WorkerState> {
        self.workers.read().get(name).map(|w| w.state.clone())
    }

    pub fn failed(&self) -> Vec<String> {
        self.workers
            .read()
            .values()
            .filter(|w| w.state.is_failed())
            .map(|w| w.name.clone())
            .collect()
    }

    /// True once every registered worker is running
    pub fn all_running(&self) -> bool {
        self.workers
            .read()
            .values()
            .all(|w| w.state == WorkerState::Running)
    }

    fn set(&self, name: &str, state: WorkerState) {
        self.workers.write().insert(
            name.to_string(),
            WorkerStatus {
                name: name.to_string(),
                state,
                since: Utc::now(),
            },
        );
    }
}

/// A worker's write access to its own entry
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    name: String,
    registry: WorkerRegistry,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn running(&self) {
        info!(worker = %self.name, "Worker running");
        self.registry.set(&self.name, WorkerState::Running);
    }

    /// Record a fatal error; the worker is expected to exit
    pub fn failed(&self, reason: impl std::fmt::Display) {
        let reason = reason.to_string();
        error!(worker = %self.name, error = %reason, "Worker stopped on fatal error");
        self.registry.set(&self.name, WorkerState::Failed(reason));
    }

    pub fn stopped(&self) {
        // A failure stays visible after the loop exits
        if self
            .registry
            .state(&self.name)
            .is_some_and(|s| s.is_failed())
        {
            return;
        }
        info!(worker = %self.name, "Worker stopped");
        self.registry.set(&self.name, WorkerState::Stopped);
    }
}
