use crate::config::MaintenanceConfig;
use crate::core::models::{
    Alert, MaintenanceTask, NewMaintenanceTask, ScheduleTaskRequest, TASK_SOURCE_ALERT,
    TASK_SOURCE_ESCALATION, TASK_SOURCE_MANUAL, TaskPriority, TaskType,
};
use crate::storage::database::Database;
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const MAX_TITLE_LEN: usize = 200;
const MAX_TASK_HOURS: u32 = 24 * 14;

/// Opens maintenance tasks, manually or on escalation
#[derive(Debug, Clone)]
pub struct MaintenanceScheduler {
    store: Arc<Database>,
    config: MaintenanceConfig,
}

impl MaintenanceScheduler {
    pub fn new(store: Arc<Database>, config: MaintenanceConfig) -> Self {
        Self { store, config }
    }

    /// `maintenance/schedule`: validate and persist a SCHEDULED task
    pub async fn schedule(
        &self,
        request: ScheduleTaskRequest,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceTask> {
        let equipment_id = request.equipment_id.trim().to_string();
        if equipment_id.is_empty() {
            return Err(EngineError::validation("equipmentId cannot be empty"));
        }

        let alert_id = match request.alert_id.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(id) => {
                self.store
                    .get_alert(id)
                    .await?
                    .ok_or_else(|| EngineError::not_found(format!("Alert {}", id)))?;
                Some(id.to_string())
            }
        };

        let title = match request.title.map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => t,
            _ => default_title(request.task_type, &equipment_id),
        };
        if title.len() > MAX_TITLE_LEN {
            return Err(EngineError::validation(format!(
                "title exceeds {} characters",
                MAX_TITLE_LEN
            )));
        }

        let hours = request
            .estimated_duration_hours
            .unwrap_or(self.config.default_task_duration_hours);
        if hours == 0 || hours > MAX_TASK_HOURS {
            return Err(EngineError::validation(format!(
                "estimatedDurationHours must be within 1..={}",
                MAX_TASK_HOURS
            )));
        }

        let source = if alert_id.is_some() {
            TASK_SOURCE_ALERT
        } else {
            TASK_SOURCE_MANUAL
        };

        let task = NewMaintenanceTask {
            equipment_id,
            alert_id,
            task_type: request.task_type,
            priority: request.priority,
            title,
            description: request.description,
            scheduled_date: request.scheduled_date,
            estimated_duration_hours: hours,
            source: source.to_string(),
        };
        self.store.insert_maintenance_task(task, now).await
    }

    pub async fn get(&self, task_id: &str) -> Result<MaintenanceTask> {
        self.store
            .get_maintenance_task(task_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Maintenance task {}", task_id)))
    }

    pub async fn list(&self, equipment_id: Option<&str>, limit: u64) -> Result<Vec<MaintenanceTask>> {
        self.store.list_maintenance_tasks(equipment_id, limit).await
    }

    /// EMERGENCY task opened when a CRITICAL alert first escalates
    pub fn escalation_task(&self, alert: &Alert, now: DateTime<Utc>) -> NewMaintenanceTask {
        NewMaintenanceTask {
            equipment_id: alert.equipment_id.clone(),
            alert_id: Some(alert.id.clone()),
            task_type: TaskType::Emergency,
            priority: TaskPriority::Critical,
            title: default_title(TaskType::Emergency, &alert.equipment_id),
            description: Some(alert.summary()),
            scheduled_date: now + self.config.lead_time(TaskPriority::Critical),
            estimated_duration_hours: self.config.default_task_duration_hours,
            source: TASK_SOURCE_ESCALATION.to_string(),
        }
    }
}

fn default_title(task_type: TaskType, equipment_id: &str) -> String {
    let kind = match task_type {
        TaskType::Routine => "Routine",
        TaskType::Preventive => "Preventive",
        TaskType::Corrective => "Corrective",
        TaskType::Emergency => "Emergency",
    };
    format!("{} maintenance for {}", kind, equipment_id)
}
