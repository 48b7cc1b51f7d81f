use crate::core::models::{AlertStatus, DispatchKey};
use crate::utils::error::{EngineError, Result};
use crate::utils::new_id;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::info;

use super::super::entities::{self, alert, alert_escalation, maintenance_task};
use super::maintenance_ops::insert_task;
use super::notification_ops::insert_job;
use super::types::{
    EscalationOutcome, EscalationRequest, SeaOrmDatabase, db_time, is_unique_violation,
};

impl SeaOrmDatabase {
    /// Tier names already recorded for an alert
    pub async fn escalated_tiers(&self, alert_id: &str) -> Result<Vec<String>> {
        Ok(entities::AlertEscalation::find()
            .filter(alert_escalation::Column::AlertId.eq(alert_id))
            .order_by_asc(alert_escalation::Column::TierMinutes)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(|row| row.tier)
            .collect())
    }

    /// Record one tier escalation with its notification job, atomically.
    ///
    /// The unique `(alert_id, tier)` index decides overlapping runs: the
    /// loser rolls back and reports `AlreadyEscalated`. An alert that was
    /// acknowledged or resolved first reports `NoLongerActive` and nothing
    /// is enqueued.
    pub async fn record_escalation(
        &self,
        request: EscalationRequest<'_>,
    ) -> Result<EscalationOutcome> {
        let now = request.now;
        let txn = self.db.begin().await.map_err(EngineError::Database)?;

        // Guarded write first: it takes the row lock, and an alert that left
        // ACTIVE before the lock was granted no longer matches
        let touched = entities::Alert::update_many()
            .col_expr(alert::Column::UpdatedAt, Expr::value(db_time(now)))
            .filter(alert::Column::Id.eq(request.alert_id))
            .filter(alert::Column::Status.eq(AlertStatus::Active.as_str()))
            .exec(&txn)
            .await
            .map_err(EngineError::Database)?;
        if touched.rows_affected == 0 {
            txn.rollback().await.map_err(EngineError::Database)?;
            return Ok(EscalationOutcome::NoLongerActive);
        }

        let recorded = entities::AlertEscalation::find()
            .filter(alert_escalation::Column::AlertId.eq(request.alert_id))
            .filter(alert_escalation::Column::Tier.eq(request.tier.name.as_str()))
            .one(&txn)
            .await
            .map_err(EngineError::Database)?;
        if recorded.is_some() {
            txn.rollback().await.map_err(EngineError::Database)?;
            return Ok(EscalationOutcome::AlreadyEscalated);
        }

        let key = DispatchKey::Escalation(request.tier.name.clone());
        let job = match insert_job(&txn, request.alert_id, request.channel, &key, now).await {
            Ok(job) => job,
            Err(EngineError::Conflict(_)) => {
                txn.rollback().await.map_err(EngineError::Database)?;
                return Ok(EscalationOutcome::AlreadyEscalated);
            }
            Err(e) => {
                txn.rollback().await.map_err(EngineError::Database)?;
                return Err(e);
            }
        };

        let escalation = alert_escalation::ActiveModel {
            id: Set(new_id()),
            alert_id: Set(request.alert_id.to_string()),
            tier: Set(request.tier.name.clone()),
            tier_minutes: Set(request.tier.after_minutes.min(i32::MAX as u64) as i32),
            notification_job_id: Set(job.id.clone()),
            escalated_at: Set(db_time(now)),
        };
        if let Err(e) = entities::AlertEscalation::insert(escalation)
            .exec_without_returning(&txn)
            .await
        {
            txn.rollback().await.map_err(EngineError::Database)?;
            if is_unique_violation(&e) {
                return Ok(EscalationOutcome::AlreadyEscalated);
            }
            return Err(EngineError::Database(e));
        }

        let mut task = None;
        if let Some(new_task) = request.task {
            let existing = entities::MaintenanceTask::find()
                .filter(maintenance_task::Column::AlertId.eq(request.alert_id))
                .count(&txn)
                .await
                .map_err(EngineError::Database)?;
            if existing == 0 {
                task = Some(insert_task(&txn, new_task, now).await?);
            }
        }

        txn.commit().await.map_err(EngineError::Database)?;

        info!(
            alert_id = %request.alert_id,
            tier = %request.tier.name,
            channel = %request.channel,
            task_created = task.is_some(),
            "Alert escalated"
        );

        Ok(EscalationOutcome::Escalated {
            job: job.into_domain()?,
            task,
        })
    }
}
