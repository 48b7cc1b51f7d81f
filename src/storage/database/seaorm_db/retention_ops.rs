use crate::core::models::AlertStatus;
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, alert, alert_escalation, maintenance_task, notification_job};
use super::types::{SeaOrmDatabase, db_time};

impl SeaOrmDatabase {
    /// Delete up to `batch_size` RESOLVED alerts resolved before `cutoff`,
    /// with their jobs and escalations, in one transaction.
    ///
    /// Maintenance tasks outlive their alert; only the back-reference is
    /// cleared. Returns the number of alerts removed.
    pub async fn purge_resolved_alerts_batch(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u64,
    ) -> Result<u64> {
        let txn = self.db.begin().await.map_err(EngineError::Database)?;

        let ids: Vec<String> = entities::Alert::find()
            .select_only()
            .column(alert::Column::Id)
            .filter(alert::Column::Status.eq(AlertStatus::Resolved.as_str()))
            .filter(alert::Column::ResolvedAt.lt(db_time(cutoff)))
            .order_by_asc(alert::Column::ResolvedAt)
            .limit(batch_size)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(EngineError::Database)?;

        if ids.is_empty() {
            txn.rollback().await.map_err(EngineError::Database)?;
            return Ok(0);
        }

        entities::MaintenanceTask::update_many()
            .col_expr(
                maintenance_task::Column::AlertId,
                Expr::value(Option::<String>::None),
            )
            .filter(maintenance_task::Column::AlertId.is_in(ids.clone()))
            .exec(&txn)
            .await
            .map_err(EngineError::Database)?;

        entities::NotificationJob::delete_many()
            .filter(notification_job::Column::AlertId.is_in(ids.clone()))
            .exec(&txn)
            .await
            .map_err(EngineError::Database)?;

        entities::AlertEscalation::delete_many()
            .filter(alert_escalation::Column::AlertId.is_in(ids.clone()))
            .exec(&txn)
            .await
            .map_err(EngineError::Database)?;

        let deleted = entities::Alert::delete_many()
            .filter(alert::Column::Id.is_in(ids))
            .filter(alert::Column::Status.eq(AlertStatus::Resolved.as_str()))
            .exec(&txn)
            .await
            .map_err(EngineError::Database)?;

        txn.commit().await.map_err(EngineError::Database)?;

        debug!(deleted = deleted.rows_affected, "Purged resolved alerts batch");
        Ok(deleted.rows_affected)
    }
}
