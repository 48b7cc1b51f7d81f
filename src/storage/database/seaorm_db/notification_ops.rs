use crate::core::models::{ChannelKind, DispatchKey, JobStatus, NotificationJob};
use crate::utils::error::{EngineError, Result};
use crate::utils::new_id;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, notification_job};
use super::types::{JobCompletion, SeaOrmDatabase, db_time, is_unique_violation};

/// Insert a PENDING job due immediately
pub(super) async fn insert_job<C: ConnectionTrait>(
    conn: &C,
    alert_id: &str,
    channel: ChannelKind,
    key: &DispatchKey,
    now: DateTime<Utc>,
) -> Result<notification_job::Model> {
    let model = notification_job::Model {
        id: new_id(),
        alert_id: alert_id.to_string(),
        channel: channel.as_str().to_string(),
        dispatch_key: key.encode(),
        escalation: key.is_escalation(),
        attempt: 0,
        status: JobStatus::Pending.as_str().to_string(),
        next_attempt_at: db_time(now),
        last_error: None,
        delivered_at: None,
        created_at: db_time(now),
        updated_at: db_time(now),
        version: 1,
    };

    let active = notification_job::ActiveModel {
        id: Set(model.id.clone()),
        alert_id: Set(model.alert_id.clone()),
        channel: Set(model.channel.clone()),
        dispatch_key: Set(model.dispatch_key.clone()),
        escalation: Set(model.escalation),
        attempt: Set(model.attempt),
        status: Set(model.status.clone()),
        next_attempt_at: Set(model.next_attempt_at),
        last_error: Set(None),
        delivered_at: Set(None),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
        version: Set(model.version),
    };
    entities::NotificationJob::insert(active)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                EngineError::conflict(format!(
                    "Job {}/{} already exists for alert {}",
                    channel,
                    key.encode(),
                    alert_id
                ))
            } else {
                EngineError::Database(e)
            }
        })?;

    debug!(
        alert_id = %alert_id,
        channel = %channel,
        dispatch_key = %model.dispatch_key,
        "Notification job enqueued"
    );
    Ok(model)
}

impl SeaOrmDatabase {
    /// Get a notification job by id
    pub async fn get_notification_job(&self, job_id: &str) -> Result<Option<NotificationJob>> {
        entities::NotificationJob::find_by_id(job_id)
            .one(&self.db)
            .await
            .map_err(EngineError::Database)?
            .map(notification_job::Model::into_domain)
            .transpose()
    }

    /// All jobs of an alert in creation order
    pub async fn list_notification_jobs(&self, alert_id: &str) -> Result<Vec<NotificationJob>> {
        entities::NotificationJob::find()
            .filter(notification_job::Column::AlertId.eq(alert_id))
            .order_by_asc(notification_job::Column::CreatedAt)
            .order_by_asc(notification_job::Column::Channel)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(notification_job::Model::into_domain)
            .collect()
    }

    /// PENDING jobs whose next attempt is due, oldest first
    pub async fn due_notification_jobs(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<NotificationJob>> {
        entities::NotificationJob::find()
            .filter(notification_job::Column::Status.eq(JobStatus::Pending.as_str()))
            .filter(notification_job::Column::NextAttemptAt.lte(db_time(now)))
            .order_by_asc(notification_job::Column::CreatedAt)
            .order_by_asc(notification_job::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(notification_job::Model::into_domain)
            .collect()
    }

    /// Take a lease on a PENDING job by pushing its next attempt to `lease_until`.
    ///
    /// Returns the claimed job, or None if it is no longer pending at the
    /// observed version.
    pub async fn claim_notification_job(
        &self,
        job: &NotificationJob,
        lease_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<NotificationJob>> {
        let result = entities::NotificationJob::update_many()
            .col_expr(
                notification_job::Column::NextAttemptAt,
                Expr::value(db_time(lease_until)),
            )
            .col_expr(notification_job::Column::UpdatedAt, Expr::value(db_time(now)))
            .col_expr(
                notification_job::Column::Version,
                Expr::col(notification_job::Column::Version).add(1),
            )
            .filter(notification_job::Column::Id.eq(job.id.as_str()))
            .filter(notification_job::Column::Version.eq(job.version))
            .filter(notification_job::Column::Status.eq(JobStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(EngineError::Database)?;

        if result.rows_affected != 1 {
            return Ok(None);
        }

        let mut claimed = job.clone();
        claimed.next_attempt_at = lease_until;
        claimed.updated_at = now;
        claimed.version += 1;
        Ok(Some(claimed))
    }

    /// Record the outcome of a claimed job. False if the lease was lost.
    pub async fn complete_notification_job(
        &self,
        claimed: &NotificationJob,
        completion: &JobCompletion,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = entities::NotificationJob::update_many()
            .col_expr(
                notification_job::Column::Status,
                Expr::value(completion.status.as_str()),
            )
            .col_expr(
                notification_job::Column::Attempt,
                Expr::value(completion.attempt as i32),
            )
            .col_expr(
                notification_job::Column::NextAttemptAt,
                Expr::value(db_time(completion.next_attempt_at)),
            )
            .col_expr(
                notification_job::Column::LastError,
                Expr::value(completion.last_error.clone()),
            )
            .col_expr(
                notification_job::Column::DeliveredAt,
                Expr::value(completion.delivered_at.map(db_time)),
            )
            .col_expr(notification_job::Column::UpdatedAt, Expr::value(db_time(now)))
            .col_expr(
                notification_job::Column::Version,
                Expr::col(notification_job::Column::Version).add(1),
            )
            .filter(notification_job::Column::Id.eq(claimed.id.as_str()))
            .filter(notification_job::Column::Version.eq(claimed.version))
            .exec(&self.db)
            .await
            .map_err(EngineError::Database)?;

        Ok(result.rows_affected == 1)
    }
}
