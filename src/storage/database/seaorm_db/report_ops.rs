use crate::core::models::{AlertStatus, DailyReport, Severity};
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::collections::BTreeMap;

use super::super::entities::{self, alert, alert_escalation, notification_job};
use super::types::{SeaOrmDatabase, db_time};

impl SeaOrmDatabase {
    /// Aggregate activity in `[start, end)` into a daily report
    pub async fn daily_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        generated_at: DateTime<Utc>,
    ) -> Result<DailyReport> {
        let by_severity: Vec<(String, i64)> = entities::Alert::find()
            .select_only()
            .column(alert::Column::Severity)
            .column_as(Expr::col(alert::Column::Id).count(), "count")
            .filter(alert::Column::CreatedAt.gte(db_time(start)))
            .filter(alert::Column::CreatedAt.lt(db_time(end)))
            .group_by(alert::Column::Severity)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?;

        let by_status: Vec<(String, i64)> = entities::Alert::find()
            .select_only()
            .column(alert::Column::Status)
            .column_as(Expr::col(alert::Column::Id).count(), "count")
            .filter(alert::Column::CreatedAt.gte(db_time(start)))
            .filter(alert::Column::CreatedAt.lt(db_time(end)))
            .group_by(alert::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?;

        let notifications: Vec<(String, i64)> = entities::NotificationJob::find()
            .select_only()
            .column(notification_job::Column::Status)
            .column_as(Expr::col(notification_job::Column::Id).count(), "count")
            .filter(notification_job::Column::CreatedAt.gte(db_time(start)))
            .filter(notification_job::Column::CreatedAt.lt(db_time(end)))
            .group_by(notification_job::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?;

        let escalations = entities::AlertEscalation::find()
            .filter(alert_escalation::Column::EscalatedAt.gte(db_time(start)))
            .filter(alert_escalation::Column::EscalatedAt.lt(db_time(end)))
            .count(&self.db)
            .await
            .map_err(EngineError::Database)?;

        let open_critical = entities::Alert::find()
            .filter(alert::Column::Severity.eq(Severity::Critical.as_str()))
            .filter(alert::Column::Status.eq(AlertStatus::Active.as_str()))
            .count(&self.db)
            .await
            .map_err(EngineError::Database)?;

        let by_severity = zero_filled(Severity::ALL.iter().map(|s| s.as_str()), by_severity);
        let by_status = zero_filled(AlertStatus::ALL.iter().map(|s| s.as_str()), by_status);
        let total_alerts = by_severity.values().sum();

        Ok(DailyReport {
            period_start: start,
            period_end: end,
            total_alerts,
            by_severity,
            by_status,
            notifications: notifications
                .into_iter()
                .map(|(status, count)| (status, count.max(0) as u64))
                .collect(),
            escalations,
            open_critical,
            generated_at,
        })
    }
}

/// Every known label appears, even with a zero count
fn zero_filled<'a>(
    labels: impl Iterator<Item = &'a str>,
    rows: Vec<(String, i64)>,
) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = labels.map(|l| (l.to_string(), 0)).collect();
    for (label, count) in rows {
        counts.insert(label, count.max(0) as u64);
    }
    counts
}
