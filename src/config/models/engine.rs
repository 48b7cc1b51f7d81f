//! Main engine configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Alert store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Alert admission policy
    #[serde(default)]
    pub alerting: AlertingConfig,
    /// Notification dispatch
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Periodic jobs
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Maintenance task scheduling
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    /// Inference collaborator
    #[serde(default)]
    pub inference: InferenceConfig,
}
