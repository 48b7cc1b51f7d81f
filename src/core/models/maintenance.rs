//! Maintenance task model

use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(EngineError::validation(format!(concat!("Unknown ", $label, ": {}"), s))),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Routine,
    Preventive,
    Corrective,
    Emergency,
}

string_enum!(TaskType, "task type", {
    Routine => "ROUTINE",
    Preventive => "PREVENTIVE",
    Corrective => "CORRECTIVE",
    Emergency => "EMERGENCY",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

string_enum!(TaskPriority, "task priority", {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Critical => "CRITICAL",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

string_enum!(TaskStatus, "task status", {
    Scheduled => "SCHEDULED",
    InProgress => "IN_PROGRESS",
    Completed => "COMPLETED",
    Cancelled => "CANCELLED",
    Overdue => "OVERDUE",
});

/// Where a task came from
pub const TASK_SOURCE_MANUAL: &str = "manual";
pub const TASK_SOURCE_ALERT: &str = "auto_alert";
pub const TASK_SOURCE_ESCALATION: &str = "escalation";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: String,
    pub equipment_id: String,
    pub alert_id: Option<String>,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub estimated_duration_hours: u32,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceTask {
    pub equipment_id: String,
    pub alert_id: Option<String>,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub estimated_duration_hours: u32,
    pub source: String,
}

/// `POST maintenance/schedule` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTaskRequest {
    pub equipment_id: String,
    pub task_type: TaskType,
    pub priority: TaskPriority,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub alert_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_duration_hours: Option<u32>,
}
