//! Tests for the periodic jobs

use super::*;
use crate::config::{EscalationTier, MaintenanceConfig, ReportConfig, ReportMode};
use crate::core::ingest::{Deduplicator, IngestOutcome};
use crate::core::lifecycle::{AlertLifecycle, TransitionRequest};
use crate::core::maintenance::MaintenanceScheduler;
use crate::core::models::{
    AlertStatus, ChannelKind, DailyReport, JobStatus, Severity, TaskPriority, TaskType,
};
use crate::core::testing::{event, store, t0};
use crate::storage::database::Database;
use chrono::{Duration, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tiers() -> Vec<EscalationTier> {
    vec![
        EscalationTier::new("15m", 15),
        EscalationTier::new("1h", 60),
        EscalationTier::new("4h", 240),
    ]
}

fn escalation_job(store: &Arc<Database>, with_tasks: bool) -> EscalationJob {
    let maintenance = with_tasks
        .then(|| MaintenanceScheduler::new(store.clone(), MaintenanceConfig::default()));
    EscalationJob::new(store.clone(), tiers(), ChannelKind::Email, maintenance)
}

async fn admit(store: &Arc<Database>, pid: &str, equipment: &str, severity: Severity) -> String {
    let dedup = Deduplicator::new(store.clone(), Duration::minutes(60));
    let candidate = event(pid, equipment, severity, 0.92).to_candidate();
    match IngestOutcome::from(dedup.admit(&candidate, "test", t0()).await.unwrap()) {
        IngestOutcome::Created { alert_id, .. } => alert_id,
        other => panic!("expected an alert, got {:?}", other),
    }
}

async fn escalation_jobs(store: &Database, alert_id: &str) -> Vec<String> {
    store
        .list_notification_jobs(alert_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|j| j.escalation)
        .map(|j| j.dispatch_key)
        .collect()
}

#[tokio::test]
async fn test_unacknowledged_critical_escalates_once() {
    let store = store().await;
    let alert_id = admit(&store, "p-1", "R-1", Severity::Critical).await;
    let job = escalation_job(&store, false);

    // Not yet due
    let summary = job.run_once(t0() + Duration::minutes(10)).await.unwrap();
    assert_eq!(summary.escalated, 0);

    let summary = job.run_once(t0() + Duration::minutes(20)).await.unwrap();
    assert_eq!(summary.escalated, 1);
    assert_eq!(escalation_jobs(&store, &alert_id).await, vec!["escalation:15m"]);

    let jobs = store.list_notification_jobs(&alert_id).await.unwrap();
    assert_eq!(jobs.len(), 3);
    let extra = jobs.iter().find(|j| j.escalation).unwrap();
    assert_eq!(extra.channel, ChannelKind::Email);
    assert_eq!(extra.status, JobStatus::Pending);

    // The same tier is never issued twice
    let summary = job.run_once(t0() + Duration::minutes(25)).await.unwrap();
    assert_eq!(summary.escalated, 0);
    assert_eq!(summary.already_escalated, 1);
    assert_eq!(escalation_jobs(&store, &alert_id).await.len(), 1);
    assert_eq!(
        store.get_alert(&alert_id).await.unwrap().unwrap().status,
        AlertStatus::Active
    );
}

#[tokio::test]
async fn test_fully_escalated_backlog_does_not_hide_new_alerts() {
    let store = store().await;
    let job = escalation_job(&store, false).with_page_size(2);
    for i in 0..5 {
        admit(&store, &format!("p-{}", i), &format!("R-{}", i), Severity::Critical).await;
    }

    let later = t0() + Duration::hours(5);
    let summary = job.run_once(later).await.unwrap();
    assert_eq!(summary.examined, 5);
    assert_eq!(summary.escalated, 5);

    // A backlog larger than one page sits at its highest tier
    let dedup = Deduplicator::new(store.clone(), Duration::minutes(60));
    let candidate = event("p-new", "R-new", Severity::Critical, 0.92).to_candidate();
    let IngestOutcome::Created { alert_id, .. } =
        IngestOutcome::from(dedup.admit(&candidate, "test", later).await.unwrap())
    else {
        panic!("expected a new alert");
    };

    let summary = job.run_once(later + Duration::minutes(20)).await.unwrap();
    assert_eq!(summary.examined, 6);
    assert_eq!(summary.already_escalated, 5);
    assert_eq!(summary.escalated, 1);
    assert_eq!(escalation_jobs(&store, &alert_id).await, vec!["escalation:15m"]);
}

#[tokio::test]
async fn test_overlapping_runs_escalate_at_most_once() {
    let store = store().await;
    let alert_id = admit(&store, "p-1", "R-1", Severity::Critical).await;
    let first = escalation_job(&store, true);
    let second = escalation_job(&store, true);
    let now = t0() + Duration::minutes(20);

    let (a, b) = tokio::join!(first.run_once(now), second.run_once(now));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.escalated + b.escalated, 1);
    assert_eq!(a.tasks_created + b.tasks_created, 1);

    assert_eq!(escalation_jobs(&store, &alert_id).await.len(), 1);
    assert_eq!(store.tasks_for_alert(&alert_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_tiers_progress_without_catch_up() {
    let store = store().await;
    let alert_id = admit(&store, "p-1", "R-1", Severity::Critical).await;
    let job = escalation_job(&store, false);

    job.run_once(t0() + Duration::minutes(16)).await.unwrap();
    job.run_once(t0() + Duration::minutes(61)).await.unwrap();
    assert_eq!(
        escalation_jobs(&store, &alert_id).await,
        vec!["escalation:15m", "escalation:1h"]
    );

    // After a long outage only the highest breached tier is issued
    let late = admit(&store, "p-2", "R-2", Severity::Critical).await;
    job.run_once(t0() + Duration::hours(5)).await.unwrap();
    assert_eq!(escalation_jobs(&store, &late).await, vec!["escalation:4h"]);
    assert_eq!(store.escalated_tiers(&late).await.unwrap(), vec!["4h"]);
}

#[tokio::test]
async fn test_maintenance_task_opened_on_first_escalation_only() {
    let store = store().await;
    let alert_id = admit(&store, "p-1", "R-1", Severity::Critical).await;
    let job = escalation_job(&store, true);

    let summary = job.run_once(t0() + Duration::minutes(16)).await.unwrap();
    assert_eq!(summary.tasks_created, 1);
    let summary = job.run_once(t0() + Duration::minutes(61)).await.unwrap();
    assert_eq!(summary.escalated, 1);
    assert_eq!(summary.tasks_created, 0);

    let tasks = store.tasks_for_alert(&alert_id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_type, TaskType::Emergency);
    assert_eq!(tasks[0].priority, TaskPriority::Critical);
    assert_eq!(tasks[0].equipment_id, "R-1");
}

#[tokio::test]
async fn test_acknowledged_and_high_alerts_are_not_escalated() {
    let store = store().await;
    let acked = admit(&store, "p-1", "R-1", Severity::Critical).await;
    let high = admit(&store, "p-2", "R-2", Severity::High).await;
    AlertLifecycle::new(store.clone())
        .acknowledge(&acked, &TransitionRequest::new("tech-1"), t0() + Duration::minutes(5))
        .await
        .unwrap();

    let summary = escalation_job(&store, true)
        .run_once(t0() + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(summary.examined, 0);
    assert!(escalation_jobs(&store, &acked).await.is_empty());
    assert!(escalation_jobs(&store, &high).await.is_empty());
}

#[test]
fn test_next_daily_run() {
    let at = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let before = Utc.with_ymd_and_hms(2025, 3, 1, 7, 59, 0).unwrap();
    assert_eq!(
        next_daily_run(before, at),
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    );

    // Exactly on time schedules tomorrow
    let on_time = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
    assert_eq!(
        next_daily_run(on_time, at),
        Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap()
    );

    let month_end = Utc.with_ymd_and_hms(2025, 3, 31, 23, 0, 0).unwrap();
    assert_eq!(
        next_daily_run(month_end, at),
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
    );
}

#[test]
fn test_duration_until_never_negative() {
    assert_eq!(
        duration_until(t0(), t0() - Duration::minutes(1)),
        std::time::Duration::ZERO
    );
    assert_eq!(
        duration_until(t0(), t0() + Duration::seconds(90)),
        std::time::Duration::from_secs(90)
    );
}

async fn resolved_alerts(store: &Arc<Database>, count: usize) {
    let lifecycle = AlertLifecycle::new(store.clone());
    for i in 0..count {
        let id = admit(store, &format!("p-{}", i), &format!("R-{}", i), Severity::High).await;
        lifecycle
            .resolve(&id, &TransitionRequest::new("tech-1"), t0())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_cleanup_purges_in_batches() {
    let store = store().await;
    resolved_alerts(&store, 5).await;
    let open = admit(&store, "p-open", "R-open", Severity::High).await;

    let job = CleanupJob::new(store.clone(), Duration::days(90), 2, 10);
    let summary = job.run_once(t0() + Duration::days(91)).await.unwrap();
    assert_eq!(summary.deleted, 5);
    assert_eq!(summary.batches, 3);
    assert!(!summary.truncated);
    assert!(store.get_alert(&open).await.unwrap().is_some());

    // Re-running is a no-op
    let summary = job.run_once(t0() + Duration::days(91)).await.unwrap();
    assert_eq!(summary.deleted, 0);
}

#[tokio::test]
async fn test_cleanup_stops_at_batch_cap() {
    let store = store().await;
    resolved_alerts(&store, 5).await;

    let job = CleanupJob::new(store.clone(), Duration::days(90), 2, 2);
    let summary = job.run_once(t0() + Duration::days(91)).await.unwrap();
    assert_eq!(summary.deleted, 4);
    assert!(summary.truncated);

    // Within retention nothing is deleted
    let early = CleanupJob::new(store.clone(), Duration::days(90), 2, 2);
    assert_eq!(early.run_once(t0() + Duration::days(30)).await.unwrap().deleted, 0);
}

#[tokio::test]
async fn test_report_counts_last_day() {
    let store = store().await;
    admit(&store, "p-1", "R-1", Severity::Critical).await;
    admit(&store, "p-2", "R-2", Severity::High).await;

    let job = DailyReportJob::new(store.clone(), Arc::new(LogReportSink));
    let report = job.run_once(t0() + Duration::hours(1)).await.unwrap();
    assert_eq!(report.total_alerts, 2);
    assert_eq!(report.by_severity["CRITICAL"], 1);
    assert_eq!(report.by_severity["LOW"], 0);
    assert_eq!(report.by_status["ACTIVE"], 2);
    assert_eq!(report.notifications["PENDING"], 3);
    assert_eq!(report.open_critical, 1);

    // Alerts older than a day fall out of the window
    let later = job.build(t0() + Duration::days(2)).await.unwrap();
    assert_eq!(later.total_alerts, 0);
    assert_eq!(later.open_critical, 1);
}

#[tokio::test]
async fn test_webhook_sink_posts_report() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = report_sink(&ReportConfig {
        mode: ReportMode::Webhook,
        url: Some(format!("{}/reports", server.uri())),
        timeout_seconds: 5,
    })
    .unwrap();
    assert_eq!(sink.name(), "webhook");

    let store = store().await;
    let job = DailyReportJob::new(store, sink);
    job.run_once(t0()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: DailyReport = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body.period_end, t0());
}

#[tokio::test]
async fn test_webhook_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = WebhookReportSink::new(server.uri(), std::time::Duration::from_secs(5)).unwrap();
    let job = DailyReportJob::new(store().await, Arc::new(sink));
    let err = job.run_once(t0()).await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[test]
fn test_webhook_mode_without_url_is_rejected() {
    let config = ReportConfig {
        mode: ReportMode::Webhook,
        url: None,
        timeout_seconds: 5,
    };
    assert!(report_sink(&config).is_err());
}

#[tokio::test]
async fn test_scheduler_rejects_bad_time() {
    let store = store().await;
    let config = crate::config::SchedulerConfig {
        cleanup_time: "2am".to_string(),
        ..Default::default()
    };
    let maintenance = MaintenanceScheduler::new(store.clone(), MaintenanceConfig::default());
    assert!(Scheduler::from_config(store, &config, maintenance, Arc::new(LogReportSink)).is_err());
}
