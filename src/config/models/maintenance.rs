//! Maintenance scheduling configuration

use crate::core::models::TaskPriority;
use serde::{Deserialize, Serialize};

/// Lead times used when a task is opened automatically
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    #[serde(default = "default_task_duration_hours")]
    pub default_task_duration_hours: u32,
    #[serde(default = "default_critical_days")]
    pub critical_days: u32,
    #[serde(default = "default_high_days")]
    pub high_days: u32,
    #[serde(default = "default_medium_days")]
    pub medium_days: u32,
    #[serde(default = "default_low_days")]
    pub low_days: u32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            default_task_duration_hours: default_task_duration_hours(),
            critical_days: default_critical_days(),
            high_days: default_high_days(),
            medium_days: default_medium_days(),
            low_days: default_low_days(),
        }
    }
}

impl MaintenanceConfig {
    /// Days from now a task of `priority` should be scheduled
    pub fn lead_time(&self, priority: TaskPriority) -> chrono::Duration {
        let days = match priority {
            TaskPriority::Critical => self.critical_days,
            TaskPriority::High => self.high_days,
            TaskPriority::Medium => self.medium_days,
            TaskPriority::Low => self.low_days,
        };
        chrono::Duration::days(days as i64)
    }
}

fn default_task_duration_hours() -> u32 {
    4
}

fn default_critical_days() -> u32 {
    7
}

fn default_high_days() -> u32 {
    15
}

fn default_medium_days() -> u32 {
    30
}

fn default_low_days() -> u32 {
    60
}
