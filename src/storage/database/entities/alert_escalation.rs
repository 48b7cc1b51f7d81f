use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One escalation issued for an alert at one SLA tier
///
/// `(alert_id, tier)` is unique, so a tier escalates at most once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alert_escalations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub alert_id: String,

    /// Tier label, e.g. `15m`
    pub tier: String,

    pub tier_minutes: i32,

    pub notification_job_id: String,

    pub escalated_at: DateTimeWithTimeZone,
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
