//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::inference::InferenceClient;
use crate::core::ingest::{EventConsumer, EventPublisher};
use crate::core::lifecycle::AlertLifecycle;
use crate::core::maintenance::MaintenanceScheduler;
use crate::core::scheduler::DailyReportJob;
use crate::monitoring::HealthChecker;
use crate::storage::database::Database;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Every field is cheap to clone; the services hold the store behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Engine configuration (shared read-only)
    pub config: Arc<Config>,
    pub store: Arc<Database>,
    pub lifecycle: AlertLifecycle,
    pub maintenance: MaintenanceScheduler,
    /// Used by `alerts/generate`, which admits synchronously
    pub consumer: EventConsumer,
    /// Ingress onto the in-process event bus
    pub publisher: EventPublisher,
    pub reports: DailyReportJob,
    pub health: HealthChecker,
    /// Absent when no inference url is configured
    pub inference: Option<Arc<dyn InferenceClient>>,
}

impl AppState {
    pub fn config(&self) -> &Config {
        &self.config
    }
}
