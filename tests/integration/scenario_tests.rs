//! End-to-end alert scenarios
//!
//! Each test drives one scenario through the public services with an
//! explicit clock.

#[cfg(test)]
mod tests {
    use crate::common::{PredictionFactory, RecordingChannel, TestDatabase, t0};
    use crate::{assert_err, assert_ok};
    use chrono::Duration;
    use predictive_alerts::EngineError;
    use predictive_alerts::config::{AlertingConfig, EscalationTier, NotificationConfig};
    use predictive_alerts::core::ingest::{Deduplicator, EventConsumer, IngestOutcome};
    use predictive_alerts::core::lifecycle::{AlertLifecycle, TransitionRequest};
    use predictive_alerts::core::models::{
        AlertFilter, AlertStatus, ChannelKind, JobStatus, Severity,
    };
    use predictive_alerts::core::notifications::{
        ChannelSet, DispatchResult, NotificationDispatcher,
    };
    use predictive_alerts::core::scheduler::EscalationJob;

    fn consumer(db: &TestDatabase) -> EventConsumer {
        let config = AlertingConfig::default();
        EventConsumer::new(
            Deduplicator::new(db.db_arc(), config.dedup_window()),
            config,
        )
    }

    fn created_id(outcome: IngestOutcome) -> String {
        match outcome {
            IngestOutcome::Created { alert_id, .. } => alert_id,
            other => panic!("expected a new alert, got {:?}", other),
        }
    }

    async fn alert_count(db: &TestDatabase) -> usize {
        db.db().list_alerts(&AlertFilter::default()).await.unwrap().len()
    }

    /// CRITICAL event creates one ACTIVE alert with email and SMS jobs
    #[tokio::test]
    async fn test_scenario_a_critical_event_creates_alert() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);

        let event = PredictionFactory::critical("p-1", "R-1");
        let alert_id = created_id(assert_ok!(consumer.process_event(&event, t0()).await));

        let alert = db.db().get_alert(&alert_id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.equipment_id, "R-1");

        let jobs = db.db().list_notification_jobs(&alert_id).await.unwrap();
        let mut channels: Vec<_> = jobs.iter().map(|j| j.channel).collect();
        channels.sort();
        assert_eq!(channels, vec![ChannelKind::Email, ChannelKind::Sms]);
        assert!(jobs.iter().all(|j| j.status == JobStatus::Pending && j.attempt == 0));
    }

    /// Same key inside the window is suppressed without new rows
    #[tokio::test]
    async fn test_scenario_b_duplicate_within_window_suppressed() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);

        let first = PredictionFactory::critical("p-1", "R-1");
        let alert_id = created_id(consumer.process_event(&first, t0()).await.unwrap());

        let second = PredictionFactory::critical("p-2", "R-1");
        let outcome = consumer
            .process_event(&second, t0() + Duration::minutes(10))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::Suppressed {
                existing_alert_id: alert_id.clone()
            }
        );
        assert_eq!(alert_count(&db).await, 1);
        assert_eq!(db.db().list_notification_jobs(&alert_id).await.unwrap().len(), 2);
    }

    /// Same key after the window opens a new alert
    #[tokio::test]
    async fn test_scenario_c_after_window_creates_new_alert() {
        let db = TestDatabase::new().await;
        let consumer = consumer(&db);

        let first = PredictionFactory::critical("p-1", "R-1");
        let old_id = created_id(consumer.process_event(&first, t0()).await.unwrap());

        let later = PredictionFactory::critical("p-2", "R-1");
        let outcome = consumer
            .process_event(&later, t0() + Duration::minutes(61))
            .await
            .unwrap();
        let new_id = created_id(outcome);
        assert_ne!(new_id, old_id);

        // Only one alert per key stays open
        let open = db.db().open_alerts_for_key("R-1", Severity::Critical).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, new_id);
        let old = db.db().get_alert(&old_id).await.unwrap().unwrap();
        assert_eq!(old.status, AlertStatus::Resolved);
    }

    /// A second acknowledge is an illegal transition
    #[tokio::test]
    async fn test_scenario_d_double_acknowledge_rejected() {
        let db = TestDatabase::new().await;
        let alert_id = created_id(
            consumer(&db)
                .process_event(&PredictionFactory::critical("p-1", "R-1"), t0())
                .await
                .unwrap(),
        );
        let lifecycle = AlertLifecycle::new(db.db_arc());

        let acked = assert_ok!(
            lifecycle
                .acknowledge(&alert_id, &TransitionRequest::new("tech-1"), t0() + Duration::minutes(3))
                .await
        );
        assert_eq!(acked.status, AlertStatus::Acknowledged);
        assert_eq!(acked.acknowledged_by.as_deref(), Some("tech-1"));

        let err = assert_err!(
            lifecycle
                .acknowledge(&alert_id, &TransitionRequest::new("tech-2"), t0() + Duration::minutes(4))
                .await
        );
        assert!(matches!(err, EngineError::InvalidState { .. }));

        let alert = lifecycle.get(&alert_id).await.unwrap();
        assert_eq!(alert.acknowledged_by.as_deref(), Some("tech-1"));
    }

    /// Unacknowledged CRITICAL past the 15 minute SLA gets exactly one
    /// extra job
    #[tokio::test]
    async fn test_scenario_e_escalation_adds_one_job() {
        let db = TestDatabase::new().await;
        let alert_id = created_id(
            consumer(&db)
                .process_event(&PredictionFactory::critical("p-1", "R-1"), t0())
                .await
                .unwrap(),
        );
        let job = EscalationJob::new(
            db.db_arc(),
            vec![EscalationTier::new("15m", 15), EscalationTier::new("1h", 60)],
            ChannelKind::Email,
            None,
        );

        let now = t0() + Duration::minutes(20);
        assert_eq!(job.run_once(now).await.unwrap().escalated, 1);
        assert_eq!(job.run_once(now + Duration::minutes(5)).await.unwrap().escalated, 0);

        let jobs = db.db().list_notification_jobs(&alert_id).await.unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs.iter().filter(|j| j.escalation).count(), 1);
    }

    /// Five consecutive channel failures park the job, the alert is untouched
    #[tokio::test]
    async fn test_scenario_f_permanent_failure_leaves_alert_active() {
        let db = TestDatabase::new().await;
        let event = PredictionFactory::create("p-1", "R-1", Severity::High, 0.8);
        let alert_id = created_id(consumer(&db).process_event(&event, t0()).await.unwrap());

        let email = RecordingChannel::failing(ChannelKind::Email, usize::MAX);
        let dispatcher = NotificationDispatcher::new(
            db.db_arc(),
            ChannelSet::new().with_channel(email.clone()),
            &NotificationConfig::default(),
        );

        let job_id = db.db().list_notification_jobs(&alert_id).await.unwrap()[0].id.clone();
        let mut due = t0();
        let mut results = Vec::new();
        for _ in 0..5 {
            let result = dispatcher.deliver(&job_id, due).await.unwrap();
            if let DispatchResult::Retrying { next_attempt_at, .. } = &result {
                due = *next_attempt_at;
            }
            results.push(result);
        }

        assert!(matches!(results[0], DispatchResult::Retrying { attempt: 1, .. }));
        assert_eq!(results[4], DispatchResult::FailedPermanent { attempt: 5 });
        assert_eq!(email.calls(), 5);

        let job = db.db().get_notification_job(&job_id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::FailedPermanent);
        assert!(job.last_error.is_some());

        let alert = db.db().get_alert(&alert_id).await.unwrap().unwrap();
        assert_eq!(alert.status, AlertStatus::Active);
        assert!(alert.acknowledged_at.is_none());
    }

    /// Backoff doubles from 30 seconds
    #[tokio::test]
    async fn test_retry_schedule_doubles() {
        let db = TestDatabase::new().await;
        let event = PredictionFactory::create("p-1", "R-1", Severity::High, 0.8);
        let alert_id = created_id(consumer(&db).process_event(&event, t0()).await.unwrap());

        let email = RecordingChannel::failing(ChannelKind::Email, 3);
        let dispatcher = NotificationDispatcher::new(
            db.db_arc(),
            ChannelSet::new().with_channel(email.clone()),
            &NotificationConfig::default(),
        );
        let job_id = db.db().list_notification_jobs(&alert_id).await.unwrap()[0].id.clone();

        let mut due = t0();
        let mut gaps = Vec::new();
        loop {
            match dispatcher.deliver(&job_id, due).await.unwrap() {
                DispatchResult::Retrying { next_attempt_at, .. } => {
                    gaps.push((next_attempt_at - due).num_seconds());
                    due = next_attempt_at;
                }
                DispatchResult::Delivered => break,
                other => panic!("unexpected result {:?}", other),
            }
        }
        assert_eq!(gaps, vec![30, 60, 120]);
        assert_eq!(email.sent().len(), 1);
    }
}
