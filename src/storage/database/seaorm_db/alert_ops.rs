use crate::core::models::{
    Alert, AlertFilter, AlertStatus, DispatchKey, NotificationJob, Severity, dedup_key,
};
use crate::utils::error::{EngineError, Result};
use crate::utils::new_id;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{debug, info};

use super::super::entities::{self, alert};
use super::notification_ops::insert_job;
use super::types::{
    AdmissionOutcome, AlertAdmission, OpenAlertDecision, SeaOrmDatabase, db_time,
    is_unique_violation,
};

/// Actor recorded when the engine closes an alert itself
pub const SYSTEM_ACTOR: &str = "system";

/// Fields written by a lifecycle transition
#[derive(Debug, Clone, Default)]
pub struct AlertTransition {
    pub status: Option<AlertStatus>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub acknowledgement_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution_notes: Option<String>,
}

impl SeaOrmDatabase {
    /// Persist an admitted candidate with its notification jobs, atomically.
    ///
    /// `decide` is consulted only when an open alert holds the same
    /// (equipment, severity) key. A unique-constraint race with a concurrent
    /// writer surfaces as `Conflict` and leaves nothing behind.
    pub async fn admit_alert<F>(
        &self,
        admission: AlertAdmission<'_>,
        decide: F,
    ) -> Result<AdmissionOutcome>
    where
        F: FnOnce(&Alert) -> OpenAlertDecision,
    {
        let candidate = admission.candidate;
        let key = dedup_key(&candidate.equipment_id, candidate.severity);
        let now = admission.now;

        let txn = self.db.begin().await.map_err(EngineError::Database)?;

        if let Some(existing) = entities::Alert::find()
            .filter(alert::Column::SourcePredictionId.eq(candidate.prediction_id.as_str()))
            .one(&txn)
            .await
            .map_err(EngineError::Database)?
        {
            txn.rollback().await.map_err(EngineError::Database)?;
            return Ok(AdmissionOutcome::Duplicate {
                alert_id: existing.id,
            });
        }

        let open = entities::Alert::find()
            .filter(alert::Column::OpenKey.eq(key.as_str()))
            .one(&txn)
            .await
            .map_err(EngineError::Database)?;

        let mut superseded = None;
        if let Some(open) = open {
            let open = open.into_domain()?;
            match decide(&open) {
                OpenAlertDecision::Suppress => {
                    txn.rollback().await.map_err(EngineError::Database)?;
                    return Ok(AdmissionOutcome::Suppressed {
                        existing_alert_id: open.id,
                    });
                }
                OpenAlertDecision::Supersede => {
                    let alert_id = new_id();
                    let transition = AlertTransition {
                        status: Some(AlertStatus::Resolved),
                        acknowledged_at: open.acknowledged_at.is_none().then_some(now),
                        acknowledged_by: open
                            .acknowledged_by
                            .is_none()
                            .then(|| SYSTEM_ACTOR.to_string()),
                        resolved_at: Some(now),
                        resolved_by: Some(SYSTEM_ACTOR.to_string()),
                        resolution_notes: Some(format!("Superseded by alert {}", alert_id)),
                        ..Default::default()
                    };
                    if !apply_transition(&txn, &open.id, open.version, &transition, now).await? {
                        txn.rollback().await.map_err(EngineError::Database)?;
                        return Err(EngineError::conflict(format!(
                            "Alert {} changed while being superseded",
                            open.id
                        )));
                    }
                    superseded = Some((open.id, alert_id));
                }
            }
        }

        let alert_id = match &superseded {
            Some((_, new_alert_id)) => new_alert_id.clone(),
            None => new_id(),
        };

        let model = alert::ActiveModel {
            id: Set(alert_id.clone()),
            equipment_id: Set(candidate.equipment_id.clone()),
            severity: Set(candidate.severity.as_str().to_string()),
            failure_probability: Set(candidate.failure_probability),
            health_score: Set(candidate.health_score),
            days_until_failure: Set(candidate.days_until_failure),
            confidence: Set(candidate.confidence.as_str().to_string()),
            status: Set(AlertStatus::Active.as_str().to_string()),
            recommended_action: Set(candidate.recommended_action.clone()),
            source: Set(admission.source.to_string()),
            source_prediction_id: Set(candidate.prediction_id.clone()),
            open_key: Set(Some(key.clone())),
            created_at: Set(db_time(now)),
            updated_at: Set(db_time(now)),
            acknowledged_at: Set(None),
            acknowledged_by: Set(None),
            acknowledgement_notes: Set(None),
            resolved_at: Set(None),
            resolved_by: Set(None),
            resolution_notes: Set(None),
            version: Set(1),
        };

        if let Err(e) = entities::Alert::insert(model)
            .exec_without_returning(&txn)
            .await
        {
            txn.rollback().await.map_err(EngineError::Database)?;
            return Err(if is_unique_violation(&e) {
                EngineError::conflict(format!("Concurrent admission for {}", key))
            } else {
                EngineError::Database(e)
            });
        }

        let mut jobs: Vec<NotificationJob> = Vec::with_capacity(admission.channels.len());
        for channel in admission.channels {
            let job = insert_job(&txn, &alert_id, *channel, &DispatchKey::Initial, now).await?;
            jobs.push(job.into_domain()?);
        }

        let created = entities::Alert::find_by_id(alert_id.as_str())
            .one(&txn)
            .await
            .map_err(EngineError::Database)?
            .ok_or_else(|| EngineError::internal("Inserted alert not visible in transaction"))?
            .into_domain()?;

        txn.commit().await.map_err(EngineError::Database)?;

        info!(
            alert_id = %created.id,
            equipment_id = %created.equipment_id,
            severity = %created.severity,
            jobs = jobs.len(),
            "Alert created"
        );

        Ok(AdmissionOutcome::Created {
            alert: created,
            jobs,
            superseded: superseded.map(|(old, _)| old),
        })
    }

    /// Get an alert by id
    pub async fn get_alert(&self, alert_id: &str) -> Result<Option<Alert>> {
        entities::Alert::find_by_id(alert_id)
            .one(&self.db)
            .await
            .map_err(EngineError::Database)?
            .map(alert::Model::into_domain)
            .transpose()
    }

    /// List alerts, newest first
    pub async fn list_alerts(&self, filter: &AlertFilter) -> Result<Vec<Alert>> {
        debug!("Listing alerts: {:?}", filter);

        let mut query = entities::Alert::find();
        if let Some(equipment_id) = &filter.equipment_id {
            query = query.filter(alert::Column::EquipmentId.eq(equipment_id.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(alert::Column::Status.eq(status.as_str()));
        }
        if let Some(severity) = filter.severity {
            query = query.filter(alert::Column::Severity.eq(severity.as_str()));
        }

        query = query
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_asc(alert::Column::Id);
        if filter.limit > 0 {
            query = query.limit(filter.limit);
        }

        query
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(alert::Model::into_domain)
            .collect()
    }

    /// Open alerts for an (equipment, severity) key
    pub async fn open_alerts_for_key(
        &self,
        equipment_id: &str,
        severity: Severity,
    ) -> Result<Vec<Alert>> {
        entities::Alert::find()
            .filter(alert::Column::EquipmentId.eq(equipment_id))
            .filter(alert::Column::Severity.eq(severity.as_str()))
            .filter(alert::Column::Status.ne(AlertStatus::Resolved.as_str()))
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(alert::Model::into_domain)
            .collect()
    }

    /// One page of ACTIVE CRITICAL alerts created at or before
    /// `created_before`, ordered by `(created_at, id)`.
    ///
    /// Pass the last alert of the previous page as `after` to continue.
    pub async fn escalation_candidates(
        &self,
        created_before: DateTime<Utc>,
        after: Option<&Alert>,
        limit: u64,
    ) -> Result<Vec<Alert>> {
        let mut query = entities::Alert::find()
            .filter(alert::Column::Status.eq(AlertStatus::Active.as_str()))
            .filter(alert::Column::Severity.eq(Severity::Critical.as_str()))
            .filter(alert::Column::CreatedAt.lte(db_time(created_before)));
        if let Some(last) = after {
            let created_at = db_time(last.created_at);
            query = query.filter(
                Condition::any()
                    .add(alert::Column::CreatedAt.gt(created_at))
                    .add(
                        Condition::all()
                            .add(alert::Column::CreatedAt.eq(created_at))
                            .add(alert::Column::Id.gt(last.id.as_str())),
                    ),
            );
        }
        query
            .order_by_asc(alert::Column::CreatedAt)
            .order_by_asc(alert::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(EngineError::Database)?
            .into_iter()
            .map(alert::Model::into_domain)
            .collect()
    }

    /// Apply `transition` if the alert is still at `expected_version`.
    ///
    /// Returns false when another writer got there first.
    pub async fn transition_alert(
        &self,
        alert_id: &str,
        expected_version: i32,
        transition: &AlertTransition,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        apply_transition(&self.db, alert_id, expected_version, transition, now).await
    }
}

/// Version-checked update. A resolved alert gives up its open key.
async fn apply_transition<C: ConnectionTrait>(
    conn: &C,
    alert_id: &str,
    expected_version: i32,
    transition: &AlertTransition,
    now: DateTime<Utc>,
) -> Result<bool> {
    let mut update = entities::Alert::update_many()
        .col_expr(alert::Column::Version, Expr::col(alert::Column::Version).add(1))
        .col_expr(alert::Column::UpdatedAt, Expr::value(db_time(now)));

    if let Some(status) = transition.status {
        update = update.col_expr(alert::Column::Status, Expr::value(status.as_str()));
        if status == AlertStatus::Resolved {
            update = update.col_expr(alert::Column::OpenKey, Expr::value(Option::<String>::None));
        }
    }
    if let Some(at) = transition.acknowledged_at {
        update = update.col_expr(alert::Column::AcknowledgedAt, Expr::value(db_time(at)));
    }
    if let Some(by) = &transition.acknowledged_by {
        update = update.col_expr(alert::Column::AcknowledgedBy, Expr::value(by.clone()));
    }
    if let Some(notes) = &transition.acknowledgement_notes {
        update = update.col_expr(
            alert::Column::AcknowledgementNotes,
            Expr::value(notes.clone()),
        );
    }
    if let Some(at) = transition.resolved_at {
        update = update.col_expr(alert::Column::ResolvedAt, Expr::value(db_time(at)));
    }
    if let Some(by) = &transition.resolved_by {
        update = update.col_expr(alert::Column::ResolvedBy, Expr::value(by.clone()));
    }
    if let Some(notes) = &transition.resolution_notes {
        update = update.col_expr(alert::Column::ResolutionNotes, Expr::value(notes.clone()));
    }

    let result = update
        .filter(alert::Column::Id.eq(alert_id))
        .filter(alert::Column::Version.eq(expected_version))
        .exec(conn)
        .await
        .map_err(EngineError::Database)?;

    Ok(result.rows_affected == 1)
}
