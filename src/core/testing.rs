//! Shared fixtures for core unit tests

use crate::config::DatabaseConfig;
use crate::core::models::{ChannelKind, Confidence, NotificationJob, PredictionEvent, Severity};
use crate::core::notifications::{NotificationChannel, NotificationMessage};
use crate::storage::database::Database;
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub async fn store() -> Arc<Database> {
    let db = Database::new(&DatabaseConfig::in_memory()).await.unwrap();
    db.migrate().await.unwrap();
    Arc::new(db)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

pub fn event(prediction_id: &str, equipment_id: &str, severity: Severity, probability: f64) -> PredictionEvent {
    PredictionEvent {
        event_type: "prediction_completed".to_string(),
        prediction_id: prediction_id.to_string(),
        equipment_id: equipment_id.to_string(),
        timestamp: t0(),
        failure_probability: probability,
        health_score: 20.0,
        severity,
        days_until_failure: 5,
        confidence: Confidence::High,
        recommended_action: None,
    }
}

pub async fn pending_jobs(store: &Database, alert_id: &str) -> Vec<NotificationJob> {
    store.list_notification_jobs(alert_id).await.unwrap()
}

/// Channel that records messages and fails the first `fail_times` sends
#[derive(Debug)]
pub struct RecordingChannel {
    kind: ChannelKind,
    fail_times: usize,
    calls: AtomicUsize,
    pub sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingChannel {
    pub fn new(kind: ChannelKind) -> Arc<Self> {
        Self::failing(kind, 0)
    }

    pub fn failing(kind: ChannelKind, fail_times: usize) -> Arc<Self> {
        Arc::new(Self {
            kind,
            fail_times,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait::async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            return Err(EngineError::delivery("relay rejected message"));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn name(&self) -> &str {
        "recording"
    }
}
