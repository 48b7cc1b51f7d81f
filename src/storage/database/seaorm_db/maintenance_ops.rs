use crate::core::models::{MaintenanceTask, NewMaintenanceTask, TaskStatus};
use crate::utils::error::{EngineError, Result};
use crate::utils::new_id;
use chrono::{DateTime, Utc};
use sea_orm::*;
use tracing::info;

use super::super::entities::{self, maintenance_task};
use super::types::{SeaOrmDatabase, db_time};

pub(super) async fn insert_task<C: ConnectionTrait>(
    conn: &C,
    task: NewMaintenanceTask,
    now: DateTime<Utc>,
) -> Result<MaintenanceTask> {
    let id = new_id();
    let model = maintenance_task::ActiveModel {
        id: Set(id.clone()),
        equipment_id: Set(task.equipment_id),
        alert_id: Set(task.alert_id),
        task_type: Set(task.task_type.as_str().to_string()),
        priority: Set(task.priority.as_str().to_string()),
        status: Set(TaskStatus::Scheduled.as_str().to_string()),
        title: Set(task.title),
        description: Set(task.description),
        scheduled_date: Set(db_time(task.scheduled_date)),
        estimated_duration_hours: Set(task.estimated_duration_hours.min(i32::MAX as u32) as i32),
        source: Set(task.source),
        created_at: Set(db_time(now)),
        updated_at: Set(db_time(now)),
    };

    entities::MaintenanceTask::insert(model)
        .exec_without_returning(conn)
        .await
        .map_err(EngineError::Database)?;

    let stored = entities::MaintenanceTask::find_by_id(id.as_str())
        .one(conn)
        .await
        .map_err(EngineError::Database)?
        .ok_or_else(|| EngineError::internal("Inserted task not visible"))?
        .into_domain()?;

    info!(
        task_id = %stored.id,
        equipment_id = %stored.equipment_id,
        priority = %stored.priority,
        source = %stored.source,
        "Maintenance task scheduled"
    );
    Ok(stored)
}

impl SeaOrmDatabase {
    pub async fn insert_maintenance_task(
        &self,
        task: NewMaintenanceTask,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceTask> {
        insert_task(&self.db, task, now).await
    }

    pub async fn get_maintenance_task(&self, task_id: &str) -> Result<Option<MaintenanceTask>> {
        entities::MaintenanceTask::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(EngineError::Database)?
            .map(maintenance_task::Model::into_domain)
            .transpose()
    }

    /// Tasks ordered by scheduled date, optionally for one piece of equipment
    pub async fn list_maintenance_tasks(
        &self,
        equipment_id: Option<&str>,
        limit: u64,
    ) -> Result<Vec<MaintenanceTask>> {
        let mut query = entities::MaintenanceTask::find();
        if let Some(equipment_id) = equipment_id {
            query = query.filter(maintenance_task::Column::EquipmentId.eq(equipment_id));
        }
        query
            .order_by_asc(maintenance_task::Column::ScheduledDate)
            .order_by_asc(maintenance_task::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(maintenance_task::Model::into_domain)
            .collect()
    }

    /// Tasks opened for an alert
    pub async fn tasks_for_alert(&self, alert_id: &str) -> Result<Vec<MaintenanceTask>> {
        entities::MaintenanceTask::find()
            .filter(maintenance_task::Column::AlertId.eq(alert_id))
            .order_by_asc(maintenance_task::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(maintenance_task::Model::into_domain)
            .collect()
    }
}
