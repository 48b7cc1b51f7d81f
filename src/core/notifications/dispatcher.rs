//! Notification dispatcher

use super::channels::{ChannelSet, NotificationMessage};
use crate::config::NotificationConfig;
use crate::core::models::{Alert, JobStatus, NotificationJob};
use crate::monitoring::WorkerHandle;
use crate::storage::database::{Database, JobCompletion};
use crate::utils::error::{EngineError, Result, RetryConfig};
use crate::utils::truncate_string;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

const MAX_ERROR_LEN: usize = 500;

/// What happened to one job
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    Delivered,
    /// Failed; another attempt is scheduled
    Retrying {
        attempt: u32,
        next_attempt_at: DateTime<Utc>,
    },
    /// Retry budget exhausted
    FailedPermanent { attempt: u32 },
    /// Already terminal, or claimed by another worker
    Skipped,
}

/// Tally of one dispatch pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub retried: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl DispatchSummary {
    fn record(&mut self, result: &DispatchResult) {
        match result {
            DispatchResult::Delivered => self.delivered += 1,
            DispatchResult::Retrying { .. } => self.retried += 1,
            DispatchResult::FailedPermanent { .. } => self.failed += 1,
            DispatchResult::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.delivered + self.retried + self.failed + self.skipped
    }
}

/// Delivers PENDING notification jobs
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    store: Arc<Database>,
    channels: ChannelSet,
    retry: RetryConfig,
    timeout: Duration,
    lease: chrono::Duration,
    batch_size: u64,
    poll_interval: Duration,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<Database>, channels: ChannelSet, config: &NotificationConfig) -> Self {
        Self {
            store,
            channels,
            retry: config.retry_config(),
            timeout: config.timeout(),
            lease: chrono::Duration::seconds(config.lease_seconds as i64),
            batch_size: config.batch_size,
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
        }
    }

    /// Poll for due jobs until shutdown or a fatal error
    pub async fn run(self, mut shutdown: watch::Receiver<bool>, health: WorkerHandle) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        health.running();

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = interval.tick() => {}
            }
            if let Err(e) = self.dispatch_with_clock(Utc::now).await {
                if e.is_fatal() {
                    health.failed(&e);
                    return;
                }
                error!("Failed to dispatch notifications: {}", e);
            }
        }
        health.stopped();
    }

    /// Process every job due at `now`, oldest first, with the clock frozen
    /// at `now`.
    ///
    /// A failure on one job does not stop the pass; only fatal errors
    /// propagate.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> Result<DispatchSummary> {
        self.dispatch_with_clock(|| now).await
    }

    /// Process every job due when the pass starts.
    ///
    /// `clock` is read again when each job is claimed and when its outcome
    /// is recorded, so leases and retry times stay correct even when earlier
    /// sends in the same pass ran into their timeout.
    pub async fn dispatch_with_clock<C>(&self, clock: C) -> Result<DispatchSummary>
    where
        C: Fn() -> DateTime<Utc> + Sync,
    {
        let jobs = self
            .store
            .due_notification_jobs(clock(), self.batch_size)
            .await?;
        let mut summary = DispatchSummary::default();

        for job in &jobs {
            match self.dispatch_job(job, &clock).await {
                Ok(result) => summary.record(&result),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(job_id = %job.id, "Dispatch failed: {}", e),
            }
        }

        if summary.total() > 0 {
            debug!(?summary, "Dispatch pass finished");
        }
        Ok(summary)
    }

    /// Deliver one job by id. Terminal jobs are a no-op.
    pub async fn deliver(&self, job_id: &str, now: DateTime<Utc>) -> Result<DispatchResult> {
        let job = self
            .store
            .get_notification_job(job_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Notification job {}", job_id)))?;
        self.dispatch_job(&job, &|| now).await
    }

    async fn dispatch_job<C>(&self, job: &NotificationJob, clock: &C) -> Result<DispatchResult>
    where
        C: Fn() -> DateTime<Utc> + Sync,
    {
        if job.status.is_terminal() {
            return Ok(DispatchResult::Skipped);
        }

        let claimed_at = clock();
        let Some(claimed) = self
            .store
            .claim_notification_job(job, claimed_at + self.lease, claimed_at)
            .await?
        else {
            debug!(job_id = %job.id, "Job claimed elsewhere");
            return Ok(DispatchResult::Skipped);
        };

        let attempt = claimed.attempt + 1;
        let outcome = match self.store.get_alert(&claimed.alert_id).await? {
            Some(alert) => self.send(&claimed, &alert).await,
            None => Err(EngineError::not_found(format!("Alert {}", claimed.alert_id))),
        };
        let now = clock();

        let (completion, result) = match outcome {
            Ok(()) => (
                JobCompletion {
                    status: JobStatus::Delivered,
                    attempt,
                    next_attempt_at: now,
                    last_error: None,
                    delivered_at: Some(now),
                },
                DispatchResult::Delivered,
            ),
            Err(e) => {
                let last_error = truncate_string(&e.to_string(), MAX_ERROR_LEN);
                let gone = matches!(e, EngineError::NotFound(_));
                if gone || self.retry.is_exhausted(attempt) {
                    (
                        JobCompletion {
                            status: JobStatus::FailedPermanent,
                            attempt,
                            next_attempt_at: now,
                            last_error: Some(last_error),
                            delivered_at: None,
                        },
                        DispatchResult::FailedPermanent { attempt },
                    )
                } else {
                    let delay = self.retry.delay_for_attempt(attempt);
                    let next_attempt_at =
                        now + chrono::Duration::milliseconds(delay.as_millis() as i64);
                    (
                        JobCompletion {
                            status: JobStatus::Pending,
                            attempt,
                            next_attempt_at,
                            last_error: Some(last_error),
                            delivered_at: None,
                        },
                        DispatchResult::Retrying {
                            attempt,
                            next_attempt_at,
                        },
                    )
                }
            }
        };

        if !self
            .store
            .complete_notification_job(&claimed, &completion, now)
            .await?
        {
            warn!(job_id = %claimed.id, "Lost lease before recording job outcome");
            return Ok(DispatchResult::Skipped);
        }

        match &result {
            DispatchResult::Delivered => info!(
                job_id = %claimed.id,
                alert_id = %claimed.alert_id,
                channel = %claimed.channel,
                attempt,
                "Notification delivered"
            ),
            DispatchResult::Retrying { next_attempt_at, .. } => warn!(
                job_id = %claimed.id,
                alert_id = %claimed.alert_id,
                channel = %claimed.channel,
                attempt,
                next_attempt_at = %next_attempt_at,
                error = completion.last_error.as_deref().unwrap_or_default(),
                "Notification failed, retry scheduled"
            ),
            DispatchResult::FailedPermanent { .. } => error!(
                job_id = %claimed.id,
                alert_id = %claimed.alert_id,
                channel = %claimed.channel,
                attempts = attempt,
                error = completion.last_error.as_deref().unwrap_or_default(),
                "Notification permanently failed"
            ),
            DispatchResult::Skipped => {}
        }

        Ok(result)
    }

    async fn send(&self, job: &NotificationJob, alert: &Alert) -> Result<()> {
        let channel = self.channels.get(job.channel).ok_or_else(|| {
            EngineError::delivery(format!("No {} channel configured", job.channel))
        })?;

        let message = NotificationMessage {
            alert_id: alert.id.clone(),
            equipment_id: alert.equipment_id.clone(),
            severity: alert.severity,
            message: message_text(job, alert),
            channel: job.channel,
        };

        match tokio::time::timeout(self.timeout, channel.send(&message)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::timeout(format!(
                "{} channel did not answer within {:?}",
                job.channel, self.timeout
            ))),
        }
    }
}

fn message_text(job: &NotificationJob, alert: &Alert) -> String {
    match job.dispatch_key.strip_prefix("escalation:") {
        Some(tier) => format!(
            "ESCALATION ({}): alert {} is still unacknowledged. {}",
            tier,
            alert.id,
            alert.summary()
        ),
        None => alert.summary(),
    }
}
