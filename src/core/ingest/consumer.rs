//! Event consumer worker

use super::dedup::Deduplicator;
use super::source::{Delivery, EventSource};
use crate::config::AlertingConfig;
use crate::core::models::{ALERT_SOURCE_PREDICTION, PredictionEvent};
use crate::monitoring::WorkerHandle;
use crate::storage::database::AdmissionOutcome;
use crate::utils::error::{EngineError, Result, RetryPolicy};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Why an event was discarded without touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    UnsupportedEventType,
    SeverityBelowHigh,
    ProbabilityBelowFloor,
}

/// Result of processing one event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    Created {
        alert_id: String,
        notification_jobs: usize,
        superseded: Option<String>,
    },
    /// Inside the dedup window of an open alert
    Suppressed { existing_alert_id: String },
    /// The prediction was already ingested
    Duplicate { alert_id: String },
    Dropped { reason: DropReason },
    /// Malformed; logged and discarded
    Invalid { reason: String },
}

impl From<AdmissionOutcome> for IngestOutcome {
    fn from(outcome: AdmissionOutcome) -> Self {
        match outcome {
            AdmissionOutcome::Created {
                alert,
                jobs,
                superseded,
            } => IngestOutcome::Created {
                alert_id: alert.id,
                notification_jobs: jobs.len(),
                superseded,
            },
            AdmissionOutcome::Suppressed { existing_alert_id } => {
                IngestOutcome::Suppressed { existing_alert_id }
            }
            AdmissionOutcome::Duplicate { alert_id } => IngestOutcome::Duplicate { alert_id },
        }
    }
}

/// Turns prediction events into admitted alerts
#[derive(Debug, Clone)]
pub struct EventConsumer {
    dedup: Deduplicator,
    config: AlertingConfig,
    store_retry: RetryPolicy,
}

impl EventConsumer {
    pub fn new(dedup: Deduplicator, config: AlertingConfig) -> Self {
        let store_retry = RetryPolicy::new(config.store_retry.retry_config());
        Self {
            dedup,
            config,
            store_retry,
        }
    }

    /// Decode and process a raw bus payload
    pub async fn process_payload(
        &self,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        match PredictionEvent::from_value(payload) {
            Ok(event) => self.process_event(&event, now).await,
            Err(e) => Ok(IngestOutcome::Invalid {
                reason: e.to_string(),
            }),
        }
    }

    /// Filter, then admit or suppress.
    ///
    /// Retryable store errors are retried in place before being returned;
    /// the caller must hand the event back for redelivery.
    pub async fn process_event(
        &self,
        event: &PredictionEvent,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        if !event.is_prediction_completed() {
            return Ok(IngestOutcome::Dropped {
                reason: DropReason::UnsupportedEventType,
            });
        }
        if let Err(e) = event.validate() {
            return Ok(IngestOutcome::Invalid {
                reason: e.to_string(),
            });
        }
        if !event.severity.warrants_alert() {
            return Ok(IngestOutcome::Dropped {
                reason: DropReason::SeverityBelowHigh,
            });
        }
        if event.failure_probability < self.config.floor_for(event.severity) {
            return Ok(IngestOutcome::Dropped {
                reason: DropReason::ProbabilityBelowFloor,
            });
        }

        let candidate = event.to_candidate();
        let outcome = self
            .store_retry
            .call_if(
                || self.dedup.admit(&candidate, ALERT_SOURCE_PREDICTION, now),
                EngineError::is_retryable,
            )
            .await?;
        Ok(outcome.into())
    }

    /// Consume `source` until shutdown or a fatal error
    pub async fn run(
        self,
        source: Arc<dyn EventSource>,
        mut shutdown: watch::Receiver<bool>,
        health: WorkerHandle,
    ) {
        health.running();
        loop {
            let delivery = tokio::select! {
                _ = shutdown.changed() => break,
                delivery = source.receive() => delivery,
            };
            let Some(delivery) = delivery else {
                info!("Event source closed");
                break;
            };
            if let Err(e) = self.handle(source.as_ref(), delivery).await {
                health.failed(&e);
                return;
            }
        }
        health.stopped();
    }

    async fn handle(&self, source: &dyn EventSource, delivery: Delivery) -> Result<()> {
        match self.process_payload(delivery.payload.clone(), Utc::now()).await {
            Ok(outcome) => {
                log_outcome(delivery.id, &outcome);
                source.ack(&delivery).await
            }
            Err(e) if e.is_fatal() => {
                // Leave the event for whoever restarts the worker
                let _ = source.nack(delivery).await;
                Err(e)
            }
            Err(e) => {
                warn!(
                    delivery_id = delivery.id,
                    redeliveries = delivery.redeliveries,
                    "Event processing failed, requeueing: {}",
                    e
                );
                source.nack(delivery).await
            }
        }
    }
}

fn log_outcome(delivery_id: u64, outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Created { alert_id, .. } => {
            debug!(delivery_id, alert_id = %alert_id, "Event admitted")
        }
        IngestOutcome::Suppressed { existing_alert_id } => {
            info!(delivery_id, existing_alert_id = %existing_alert_id, "Event suppressed as duplicate")
        }
        IngestOutcome::Duplicate { alert_id } => {
            debug!(delivery_id, alert_id = %alert_id, "Prediction already ingested")
        }
        IngestOutcome::Dropped { reason } => debug!(delivery_id, ?reason, "Event dropped"),
        IngestOutcome::Invalid { reason } => {
            warn!(delivery_id, reason = %reason, "Invalid event discarded")
        }
    }
}
