//! Background workers for the periodic jobs

use super::cleanup::CleanupJob;
use super::escalation::EscalationJob;
use super::report::{DailyReportJob, ReportSink};
use super::schedule::{duration_until, next_daily_run};
use crate::config::SchedulerConfig;
use crate::core::maintenance::MaintenanceScheduler;
use crate::monitoring::{WorkerHandle, WorkerRegistry};
use crate::storage::database::Database;
use crate::utils::error::{EngineError, Result};
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Owns the three periodic jobs. Each runs on its own task so a slow
/// report cannot delay escalations.
#[derive(Debug)]
pub struct Scheduler {
    escalation: EscalationJob,
    escalation_interval: Duration,
    report: DailyReportJob,
    report_at: NaiveTime,
    cleanup: CleanupJob,
    cleanup_at: NaiveTime,
}

impl Scheduler {
    pub fn from_config(
        store: Arc<Database>,
        config: &SchedulerConfig,
        maintenance: MaintenanceScheduler,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self> {
        let report_at = config.report_time().map_err(EngineError::Config)?;
        let cleanup_at = config.cleanup_at().map_err(EngineError::Config)?;

        let maintenance = config
            .create_maintenance_task_on_escalation
            .then_some(maintenance);

        Ok(Self {
            escalation: EscalationJob::new(
                store.clone(),
                config.escalation_tiers.clone(),
                config.escalation_channel,
                maintenance,
            ),
            escalation_interval: Duration::from_secs(config.escalation_interval_seconds.max(1)),
            report: DailyReportJob::new(store.clone(), sink),
            report_at,
            cleanup: CleanupJob::new(
                store,
                config.retention(),
                config.cleanup_batch_size,
                config.cleanup_max_batches,
            ),
            cleanup_at,
        })
    }

    /// Start every job; each stops when `shutdown` flips
    pub fn spawn(
        self,
        shutdown: watch::Receiver<bool>,
        registry: &WorkerRegistry,
    ) -> Vec<JoinHandle<()>> {
        info!(
            report_at = %self.report_at,
            cleanup_at = %self.cleanup_at,
            escalation_every = ?self.escalation_interval,
            "Starting scheduler"
        );

        vec![
            tokio::spawn(run_escalation(
                self.escalation,
                self.escalation_interval,
                shutdown.clone(),
                registry.register("escalation"),
            )),
            tokio::spawn(run_report(
                self.report,
                self.report_at,
                shutdown.clone(),
                registry.register("daily-report"),
            )),
            tokio::spawn(run_cleanup(
                self.cleanup,
                self.cleanup_at,
                shutdown,
                registry.register("cleanup"),
            )),
        ]
    }
}

async fn run_escalation(
    job: EscalationJob,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
    health: WorkerHandle,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    health.running();

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => {}
        }
        if let Err(e) = job.run_once(Utc::now()).await {
            if e.is_fatal() {
                health.failed(&e);
                return;
            }
            error!("Escalation sweep failed: {}", e);
        }
    }
    health.stopped();
}

async fn run_report(
    job: DailyReportJob,
    at: NaiveTime,
    mut shutdown: watch::Receiver<bool>,
    health: WorkerHandle,
) {
    health.running();

    loop {
        let now = Utc::now();
        let wait = duration_until(now, next_daily_run(now, at));
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(wait) => {}
        }
        // Missed or failed reports are not caught up
        if let Err(e) = job.run_once(Utc::now()).await {
            if e.is_fatal() {
                health.failed(&e);
                return;
            }
            error!("Daily report failed: {}", e);
        }
    }
    health.stopped();
}

async fn run_cleanup(
    job: CleanupJob,
    at: NaiveTime,
    mut shutdown: watch::Receiver<bool>,
    health: WorkerHandle,
) {
    health.running();

    loop {
        let now = Utc::now();
        let wait = duration_until(now, next_daily_run(now, at));
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = tokio::time::sleep(wait) => {}
        }
        if let Err(e) = job.run_once(Utc::now()).await {
            if e.is_fatal() {
                health.failed(&e);
                return;
            }
            error!("Retention cleanup failed: {}", e);
        }
    }
    health.stopped();
}
