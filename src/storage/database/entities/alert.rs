use crate::core::models::{self, decode_column};
use crate::utils::error::Result as EngineResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub equipment_id: String,

    pub severity: String,

    pub failure_probability: f64,

    pub health_score: f64,

    pub days_until_failure: i32,

    pub confidence: String,

    /// ACTIVE, ACKNOWLEDGED or RESOLVED
    pub status: String,

    pub recommended_action: String,

    pub source: String,

    /// Triggering prediction (unique)
    #[sea_orm(unique)]
    pub source_prediction_id: String,

    /// `equipment:SEVERITY` while the alert is open, NULL once resolved (unique)
    #[sea_orm(unique)]
    pub open_key: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    pub acknowledged_at: Option<DateTimeWithTimeZone>,

    pub acknowledged_by: Option<String>,

    pub acknowledgement_notes: Option<String>,

    pub resolved_at: Option<DateTimeWithTimeZone>,

    pub resolved_by: Option<String>,

    pub resolution_notes: Option<String>,

    /// Optimistic concurrency counter
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notification_job::Entity")]
    NotificationJobs,
    #[sea_orm(has_many = "super::alert_escalation::Entity")]
    Escalations,
}

impl Related<super::notification_job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationJobs.def()
    }
}

impl Related<super::alert_escalation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Escalations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert a row into the domain alert
    pub fn into_domain(self) -> EngineResult<models::Alert> {
        Ok(models::Alert {
            severity: decode_column("alerts.severity", &self.severity)?,
            confidence: decode_column("alerts.confidence", &self.confidence)?,
            status: decode_column("alerts.status", &self.status)?,
            id: self.id,
            equipment_id: self.equipment_id,
            failure_probability: self.failure_probability,
            health_score: self.health_score,
            days_until_failure: self.days_until_failure,
            recommended_action: self.recommended_action,
            source: self.source,
            source_prediction_id: self.source_prediction_id,
            created_at: self.created_at.with_timezone(&chrono::Utc),
            updated_at: self.updated_at.with_timezone(&chrono::Utc),
            acknowledged_at: self.acknowledged_at.map(|t| t.with_timezone(&chrono::Utc)),
            acknowledged_by: self.acknowledged_by,
            acknowledgement_notes: self.acknowledgement_notes,
            resolved_at: self.resolved_at.map(|t| t.with_timezone(&chrono::Utc)),
            resolved_by: self.resolved_by,
            resolution_notes: self.resolution_notes,
            version: self.version,
        })
    }
}
