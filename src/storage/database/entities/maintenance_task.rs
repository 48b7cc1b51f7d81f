use crate::core::models::{self, decode_column};
use crate::utils::error::Result as EngineResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maintenance task database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub equipment_id: String,

    /// Back-reference to the alert that prompted the task, if any
    pub alert_id: Option<String>,

    pub task_type: String,

    pub priority: String,

    pub status: String,

    pub title: String,

    pub description: Option<String>,

    pub scheduled_date: DateTimeWithTimeZone,

    pub estimated_duration_hours: i32,

    /// manual, auto_alert or escalation
    pub source: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self) -> EngineResult<models::MaintenanceTask> {
        Ok(models::MaintenanceTask {
            task_type: decode_column("maintenance_tasks.task_type", &self.task_type)?,
            priority: decode_column("maintenance_tasks.priority", &self.priority)?,
            status: decode_column("maintenance_tasks.status", &self.status)?,
            id: self.id,
            equipment_id: self.equipment_id,
            alert_id: self.alert_id,
            title: self.title,
            description: self.description,
            scheduled_date: self.scheduled_date.with_timezone(&chrono::Utc),
            estimated_duration_hours: self.estimated_duration_hours.max(0) as u32,
            source: self.source,
            created_at: self.created_at.with_timezone(&chrono::Utc),
            updated_at: self.updated_at.with_timezone(&chrono::Utc),
        })
    }
}
