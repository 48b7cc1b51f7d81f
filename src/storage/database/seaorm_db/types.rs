use crate::config::EscalationTier;
use crate::core::models::{
    Alert, CandidateAlert, ChannelKind, JobStatus, MaintenanceTask, NewMaintenanceTask,
    NotificationJob,
};
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

/// SeaORM-based alert store
#[derive(Debug, Clone)]
pub struct SeaOrmDatabase {
    pub(super) db: DatabaseConnection,
}

/// What to do with an open alert that shares the candidate's key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAlertDecision {
    /// Inside the dedup window: drop the candidate
    Suppress,
    /// Outside the window: close the old alert and admit the candidate
    Supersede,
}

/// Result of one admission attempt
#[derive(Debug, Clone)]
pub enum AdmissionOutcome {
    /// Alert persisted together with its notification jobs
    Created {
        alert: Alert,
        jobs: Vec<NotificationJob>,
        superseded: Option<String>,
    },
    /// An open alert for the same key is still inside the window
    Suppressed { existing_alert_id: String },
    /// The prediction already produced an alert
    Duplicate { alert_id: String },
}

/// Input for persisting an admitted candidate
#[derive(Debug, Clone)]
pub struct AlertAdmission<'a> {
    pub candidate: &'a CandidateAlert,
    pub channels: &'a [ChannelKind],
    pub source: &'a str,
    pub now: DateTime<Utc>,
}

/// Input for recording one escalation
#[derive(Debug, Clone)]
pub struct EscalationRequest<'a> {
    pub alert_id: &'a str,
    pub tier: &'a EscalationTier,
    pub channel: ChannelKind,
    /// Task to open alongside the escalation, unless the alert already has one
    pub task: Option<NewMaintenanceTask>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum EscalationOutcome {
    Escalated {
        job: NotificationJob,
        task: Option<MaintenanceTask>,
    },
    /// The tier was already recorded, possibly by an overlapping run
    AlreadyEscalated,
    /// Acknowledged, resolved or deleted since it was selected
    NoLongerActive,
}

/// Final state written for a claimed job
#[derive(Debug, Clone)]
pub struct JobCompletion {
    pub status: JobStatus,
    pub attempt: u32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
}

pub(super) fn db_time(t: DateTime<Utc>) -> DateTimeWithTimeZone {
    t.into()
}

pub(super) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
