use super::*;
use crate::config::MaintenanceConfig;
use crate::core::ingest::Deduplicator;
use crate::core::models::*;
use crate::core::testing::{event, store, t0};
use crate::storage::database::AdmissionOutcome;
use crate::utils::error::EngineError;
use chrono::Duration;

fn request() -> ScheduleTaskRequest {
    ScheduleTaskRequest {
        equipment_id: "R-1".to_string(),
        task_type: TaskType::Preventive,
        priority: TaskPriority::High,
        scheduled_date: t0() + Duration::days(3),
        alert_id: None,
        title: None,
        description: None,
        estimated_duration_hours: None,
    }
}

#[tokio::test]
async fn test_manual_task_defaults() {
    let scheduler = MaintenanceScheduler::new(store().await, MaintenanceConfig::default());
    let task = scheduler.schedule(request(), t0()).await.unwrap();

    assert_eq!(task.status, TaskStatus::Scheduled);
    assert_eq!(task.source, TASK_SOURCE_MANUAL);
    assert_eq!(task.title, "Preventive maintenance for R-1");
    assert_eq!(task.estimated_duration_hours, 4);
    assert_eq!(task.scheduled_date, t0() + Duration::days(3));
    assert_eq!(scheduler.get(&task.id).await.unwrap(), task);
}

#[tokio::test]
async fn test_linked_task_requires_existing_alert() {
    let store = store().await;
    let scheduler = MaintenanceScheduler::new(store.clone(), MaintenanceConfig::default());

    let mut missing = request();
    missing.alert_id = Some("nope".to_string());
    assert!(matches!(
        scheduler.schedule(missing, t0()).await,
        Err(EngineError::NotFound(_))
    ));

    let dedup = Deduplicator::new(store.clone(), Duration::minutes(60));
    let AdmissionOutcome::Created { alert, .. } = dedup
        .admit(&event("p-1", "R-1", Severity::High, 0.9).to_candidate(), "test", t0())
        .await
        .unwrap()
    else {
        panic!("expected an alert");
    };

    let mut linked = request();
    linked.alert_id = Some(alert.id.clone());
    let task = scheduler.schedule(linked, t0()).await.unwrap();
    assert_eq!(task.alert_id.as_deref(), Some(alert.id.as_str()));
    assert_eq!(task.source, TASK_SOURCE_ALERT);
}

#[tokio::test]
async fn test_schedule_rejects_bad_input() {
    let scheduler = MaintenanceScheduler::new(store().await, MaintenanceConfig::default());

    let mut blank = request();
    blank.equipment_id = " ".to_string();
    assert!(matches!(
        scheduler.schedule(blank, t0()).await,
        Err(EngineError::Validation(_))
    ));

    let mut zero = request();
    zero.estimated_duration_hours = Some(0);
    assert!(matches!(
        scheduler.schedule(zero, t0()).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn test_escalation_task_shape() {
    let store = store().await;
    let scheduler = MaintenanceScheduler::new(store.clone(), MaintenanceConfig::default());
    let dedup = Deduplicator::new(store, Duration::minutes(60));
    let AdmissionOutcome::Created { alert, .. } = dedup
        .admit(&event("p-1", "R-9", Severity::Critical, 0.9).to_candidate(), "test", t0())
        .await
        .unwrap()
    else {
        panic!("expected an alert");
    };

    let task = scheduler.escalation_task(&alert, t0());
    assert_eq!(task.task_type, TaskType::Emergency);
    assert_eq!(task.priority, TaskPriority::Critical);
    assert_eq!(task.scheduled_date, t0() + Duration::days(7));
    assert_eq!(task.source, TASK_SOURCE_ESCALATION);
    assert_eq!(task.alert_id.as_deref(), Some(alert.id.as_str()));
}
