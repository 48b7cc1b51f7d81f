//! Concurrency properties
//!
//! Competing writers race on the same rows; the store's unique keys and
//! version checks must leave exactly one winner.

#[cfg(test)]
mod tests {
    use crate::common::{PredictionFactory, RecordingChannel, TestDatabase, t0};
    use chrono::Duration;
    use predictive_alerts::EngineError;
    use predictive_alerts::config::{AlertingConfig, EscalationTier, NotificationConfig};
    use predictive_alerts::core::ingest::{Deduplicator, EventConsumer, IngestOutcome};
    use predictive_alerts::core::lifecycle::{AlertLifecycle, TransitionRequest};
    use predictive_alerts::core::models::{AlertFilter, ChannelKind, JobStatus, Severity};
    use predictive_alerts::core::notifications::{ChannelSet, NotificationDispatcher};
    use predictive_alerts::core::scheduler::EscalationJob;

    fn consumer(db: &TestDatabase) -> EventConsumer {
        let config = AlertingConfig::default();
        EventConsumer::new(
            Deduplicator::new(db.db_arc(), config.dedup_window()),
            config,
        )
    }

    #[tokio::test]
    async fn test_concurrent_events_for_one_key_open_one_alert() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let consumer = consumer.clone();
                tokio::spawn(async move {
                    let event = PredictionFactory::critical(&format!("p-{}", i), "R-1");
                    consumer.process_event(&event, t0()).await
                })
            })
            .collect();

        let mut created = 0;
        let mut suppressed = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                IngestOutcome::Created { .. } => created += 1,
                IngestOutcome::Suppressed { .. } => suppressed += 1,
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(suppressed, 7);
        assert_eq!(
            db.db().open_alerts_for_key("R-1", Severity::Critical).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_redelivered_event_is_idempotent() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);
        let event = PredictionFactory::critical("p-1", "R-1");

        let (a, b) = tokio::join!(
            consumer.process_event(&event, t0()),
            consumer.process_event(&event, t0() + Duration::minutes(90)),
        );
        let outcomes = [a.unwrap(), b.unwrap()];
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| matches!(o, IngestOutcome::Created { .. }))
                .count(),
            1
        );
        assert_eq!(
            db.db().list_alerts(&AlertFilter::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_concurrent_acknowledge_has_one_winner() {
        let db = TestDatabase::new().await;
        let outcome = consumer(&db)
            .process_event(&PredictionFactory::critical("p-1", "R-1"), t0())
            .await
            .unwrap();
        let IngestOutcome::Created { alert_id, .. } = outcome else {
            panic!("expected a new alert");
        };

        let lifecycle = AlertLifecycle::new(db.db_arc());
        let now = t0() + Duration::minutes(2);
        let first = TransitionRequest::new("tech-1");
        let second = TransitionRequest::new("tech-2");
        let (a, b) = tokio::join!(
            lifecycle.acknowledge(&alert_id, &first, now),
            lifecycle.acknowledge(&alert_id, &second, now),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(|r| r.err()).unwrap();
        assert!(matches!(
            loser,
            EngineError::InvalidState { .. } | EngineError::Conflict(_)
        ));

        let alert = lifecycle.get(&alert_id).await.unwrap();
        assert_eq!(alert.version, 2);
    }

    #[tokio::test]
    async fn test_parallel_dispatchers_deliver_each_job_once() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);
        for i in 0..4 {
            let event = PredictionFactory::critical(&format!("p-{}", i), &format!("R-{}", i));
            consumer.process_event(&event, t0()).await.unwrap();
        }

        let email = RecordingChannel::new(ChannelKind::Email);
        let sms = RecordingChannel::new(ChannelKind::Sms);
        let channels = ChannelSet::new()
            .with_channel(email.clone())
            .with_channel(sms.clone());
        let config = NotificationConfig::default();
        let first = NotificationDispatcher::new(db.db_arc(), channels.clone(), &config);
        let second = NotificationDispatcher::new(db.db_arc(), channels, &config);

        let (a, b) = tokio::join!(first.dispatch_due(t0()), second.dispatch_due(t0()));
        let delivered = a.unwrap().delivered + b.unwrap().delivered;
        assert_eq!(delivered, 8);
        assert_eq!(email.sent().len(), 4);
        assert_eq!(sms.sent().len(), 4);

        for alert in db.db().list_alerts(&AlertFilter::default()).await.unwrap() {
            let jobs = db.db().list_notification_jobs(&alert.id).await.unwrap();
            assert!(jobs.iter().all(|j| j.status == JobStatus::Delivered && j.attempt == 1));
        }
    }

    #[tokio::test]
    async fn test_overlapping_escalation_sweeps() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);
        for i in 0..3 {
            let event = PredictionFactory::critical(&format!("p-{}", i), &format!("R-{}", i));
            consumer.process_event(&event, t0()).await.unwrap();
        }

        let tiers = vec![EscalationTier::new("15m", 15)];
        let a = EscalationJob::new(db.db_arc(), tiers.clone(), ChannelKind::Email, None);
        let b = EscalationJob::new(db.db_arc(), tiers, ChannelKind::Email, None);
        let now = t0() + Duration::minutes(30);

        let (ra, rb) = tokio::join!(a.run_once(now), b.run_once(now));
        assert_eq!(ra.unwrap().escalated + rb.unwrap().escalated, 3);

        for alert in db.db().list_alerts(&AlertFilter::default()).await.unwrap() {
            let escalations = db
                .db()
                .list_notification_jobs(&alert.id)
                .await
                .unwrap()
                .into_iter()
                .filter(|j| j.escalation)
                .count();
            assert_eq!(escalations, 1);
        }
    }
}
