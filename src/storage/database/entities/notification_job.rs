use crate::core::models::{self, decode_column};
use crate::utils::error::Result as EngineResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification job database model
///
/// `(alert_id, channel, dispatch_key)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub alert_id: String,

    /// email or sms
    pub channel: String,

    /// `initial` or `escalation:<tier>`
    pub dispatch_key: String,

    pub escalation: bool,

    /// Delivery attempts made so far
    pub attempt: i32,

    /// PENDING, DELIVERED or FAILED_PERMANENT
    pub status: String,

    pub next_attempt_at: DateTimeWithTimeZone,

    pub last_error: Option<String>,

    pub delivered_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::alert::Entity",
        from = "Column::AlertId",
        to = "super::alert::Column::Id"
    )]
    Alert,
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self) -> EngineResult<models::NotificationJob> {
        Ok(models::NotificationJob {
            channel: decode_column("notification_jobs.channel", &self.channel)?,
            status: decode_column("notification_jobs.status", &self.status)?,
            id: self.id,
            alert_id: self.alert_id,
            dispatch_key: self.dispatch_key,
            escalation: self.escalation,
            attempt: self.attempt.max(0) as u32,
            next_attempt_at: self.next_attempt_at.with_timezone(&chrono::Utc),
            last_error: self.last_error,
            delivered_at: self.delivered_at.map(|t| t.with_timezone(&chrono::Utc)),
            created_at: self.created_at.with_timezone(&chrono::Utc),
            updated_at: self.updated_at.with_timezone(&chrono::Utc),
            version: self.version,
        })
    }
}
