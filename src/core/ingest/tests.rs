//! Tests for event ingestion

use super::*;
use crate::config::AlertingConfig;
use crate::core::models::{AlertFilter, AlertStatus, Severity};
use crate::core::testing::{event, pending_jobs, store, t0};
use crate::monitoring::{WorkerRegistry, WorkerState};
use crate::storage::database::Database;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::watch;

fn consumer(store: Arc<Database>) -> EventConsumer {
    let config = AlertingConfig::default();
    EventConsumer::new(Deduplicator::new(store, config.dedup_window()), config)
}

#[tokio::test]
async fn test_critical_event_creates_alert_with_two_jobs() {
    let store = store().await;
    let consumer = consumer(store.clone());

    let outcome = consumer
        .process_event(&event("p-1", "R-1", Severity::Critical, 0.85), t0())
        .await
        .unwrap();
    let IngestOutcome::Created {
        alert_id,
        notification_jobs,
        ..
    } = outcome
    else {
        panic!("expected an alert, got {:?}", outcome);
    };
    assert_eq!(notification_jobs, 2);

    let alert = store.get_alert(&alert_id).await.unwrap().unwrap();
    assert_eq!(alert.status, AlertStatus::Active);
    assert_eq!(alert.source, "ml_prediction");
    assert!(alert.recommended_action.starts_with("Schedule immediate maintenance"));
    assert_eq!(pending_jobs(&store, &alert_id).await.len(), 2);
}

#[tokio::test]
async fn test_high_event_routes_email_only() {
    let store = store().await;
    let outcome = consumer(store.clone())
        .process_event(&event("p-1", "R-1", Severity::High, 0.7), t0())
        .await
        .unwrap();
    let IngestOutcome::Created { alert_id, .. } = outcome else {
        panic!("expected an alert");
    };
    let jobs = pending_jobs(&store, &alert_id).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].channel, crate::core::models::ChannelKind::Email);
}

#[tokio::test]
async fn test_low_and_medium_events_dropped() {
    let store = store().await;
    let consumer = consumer(store.clone());
    for (i, severity) in [Severity::Low, Severity::Medium].into_iter().enumerate() {
        let outcome = consumer
            .process_event(&event(&format!("p-{}", i), "R-1", severity, 0.95), t0())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::Dropped {
                reason: DropReason::SeverityBelowHigh
            }
        );
    }
    assert!(store.list_alerts(&AlertFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_probability_floor_applies_to_critical() {
    let store = store().await;
    let outcome = consumer(store.clone())
        .process_event(&event("p-1", "R-1", Severity::Critical, 0.4), t0())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Dropped {
            reason: DropReason::ProbabilityBelowFloor
        }
    );
}

#[tokio::test]
async fn test_window_suppresses_then_expires() {
    let store = store().await;
    let consumer = consumer(store.clone());

    let first = consumer
        .process_event(&event("p-1", "R-1", Severity::Critical, 0.85), t0())
        .await
        .unwrap();
    let IngestOutcome::Created { alert_id, .. } = first else {
        panic!("expected an alert");
    };

    let second = consumer
        .process_event(
            &event("p-2", "R-1", Severity::Critical, 0.9),
            t0() + Duration::minutes(10),
        )
        .await
        .unwrap();
    assert_eq!(
        second,
        IngestOutcome::Suppressed {
            existing_alert_id: alert_id.clone()
        }
    );
    assert_eq!(pending_jobs(&store, &alert_id).await.len(), 2);

    let third = consumer
        .process_event(
            &event("p-3", "R-1", Severity::Critical, 0.9),
            t0() + Duration::minutes(61),
        )
        .await
        .unwrap();
    assert!(matches!(third, IngestOutcome::Created { superseded: Some(ref old), .. } if *old == alert_id));

    let open = store.open_alerts_for_key("R-1", Severity::Critical).await.unwrap();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn test_replayed_prediction_is_noop() {
    let store = store().await;
    let consumer = consumer(store.clone());
    let e = event("p-1", "R-1", Severity::High, 0.8);

    consumer.process_event(&e, t0()).await.unwrap();
    let replay = consumer
        .process_event(&e, t0() + Duration::hours(5))
        .await
        .unwrap();
    assert!(matches!(replay, IngestOutcome::Duplicate { .. }));
    assert_eq!(store.list_alerts(&AlertFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_payload_is_invalid() {
    let store = store().await;
    let consumer = consumer(store.clone());

    let outcome = consumer
        .process_payload(serde_json::json!({"predictionId": "p-1"}), t0())
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Invalid { .. }));

    let mut bad = event("p-2", "R-1", Severity::High, 1.5);
    bad.health_score = 50.0;
    let outcome = consumer.process_event(&bad, t0()).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Invalid { .. }));
}

#[tokio::test]
async fn test_other_event_types_ignored() {
    let store = store().await;
    let mut e = event("p-1", "R-1", Severity::Critical, 0.9);
    e.event_type = "model_retrained".to_string();
    let outcome = consumer(store).process_event(&e, t0()).await.unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Dropped {
            reason: DropReason::UnsupportedEventType
        }
    );
}

#[tokio::test]
async fn test_worker_consumes_bus_until_shutdown() {
    let store = store().await;
    let (source, publisher) = ChannelEventSource::new(16);
    let registry = WorkerRegistry::new();
    let handle = registry.register("event-consumer");
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = tokio::spawn(consumer(store.clone()).run(Arc::new(source), shutdown_rx, handle));

    let payload = serde_json::to_value(event("p-1", "R-1", Severity::Critical, 0.85)).unwrap();
    publisher.publish(payload).await.unwrap();
    publisher.publish(serde_json::json!({"garbage": true})).await.unwrap();

    let mut created = Vec::new();
    for _ in 0..100 {
        created = store.list_alerts(&AlertFilter::default()).await.unwrap();
        if !created.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(created.len(), 1);
    assert_eq!(registry.state("event-consumer"), Some(WorkerState::Running));

    shutdown_tx.send(true).unwrap();
    worker.await.unwrap();
    assert_eq!(registry.state("event-consumer"), Some(WorkerState::Stopped));
}

#[tokio::test]
async fn test_dedup_decision_boundary() {
    let store = store().await;
    let dedup = Deduplicator::new(store.clone(), Duration::minutes(60));
    let outcome = dedup
        .admit(&event("p-1", "R-1", Severity::High, 0.9).to_candidate(), "test", t0())
        .await
        .unwrap();
    let crate::storage::database::AdmissionOutcome::Created { alert, .. } = outcome else {
        panic!("expected an alert");
    };

    use crate::storage::database::OpenAlertDecision;
    assert_eq!(
        dedup.decide(&alert, t0() + Duration::minutes(59)),
        OpenAlertDecision::Suppress
    );
    assert_eq!(
        dedup.decide(&alert, t0() + Duration::minutes(60)),
        OpenAlertDecision::Supersede
    );
}
