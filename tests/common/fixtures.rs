//! Test fixtures and data factories

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use predictive_alerts::Result;
use predictive_alerts::core::models::{ChannelKind, Confidence, PredictionEvent, Severity};
use predictive_alerts::core::notifications::{NotificationChannel, NotificationMessage};
use predictive_alerts::utils::error::EngineError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed reference time for scenario tests
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

/// Factory for prediction events
pub struct PredictionFactory;

impl PredictionFactory {
    pub fn create(
        prediction_id: &str,
        equipment_id: &str,
        severity: Severity,
        failure_probability: f64,
    ) -> PredictionEvent {
        PredictionEvent {
            event_type: "prediction_completed".to_string(),
            prediction_id: prediction_id.to_string(),
            equipment_id: equipment_id.to_string(),
            timestamp: t0(),
            failure_probability,
            health_score: 18.0,
            severity,
            days_until_failure: 7,
            confidence: Confidence::High,
            recommended_action: None,
        }
    }

    pub fn critical(prediction_id: &str, equipment_id: &str) -> PredictionEvent {
        Self::create(prediction_id, equipment_id, Severity::Critical, 0.85)
    }

    /// The wire form of an event, as published on the bus
    pub fn payload(event: &PredictionEvent) -> serde_json::Value {
        serde_json::to_value(event).unwrap()
    }
}

/// Channel that records messages and fails the first `fail_times` sends
#[derive(Debug)]
pub struct RecordingChannel {
    kind: ChannelKind,
    fail_times: usize,
    calls: AtomicUsize,
    sent: Mutex<Vec<NotificationMessage>>,
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

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            return Err(EngineError::delivery("gateway returned 503"));
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
