//! The event pipeline with real workers
//!
//! Events go through the in-process bus into the consumer worker; the
//! dispatcher worker delivers the resulting jobs.

#[cfg(test)]
mod tests {
    use crate::common::{PredictionFactory, RecordingChannel, TestDatabase};
    use predictive_alerts::config::{AlertingConfig, NotificationConfig};
    use predictive_alerts::core::ingest::{
        ChannelEventSource, Deduplicator, EventConsumer, EventSource,
    };
    use predictive_alerts::core::models::{AlertFilter, ChannelKind, JobStatus, Severity};
    use predictive_alerts::core::notifications::{ChannelSet, NotificationDispatcher};
    use predictive_alerts::monitoring::{WorkerRegistry, WorkerState};
    use predictive_alerts::storage::database::Database;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Poll until `check` passes or five seconds elapse
    async fn eventually<F, Fut>(mut check: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..250 {
            if check().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    async fn alerts(db: &Database) -> usize {
        db.list_alerts(&AlertFilter::default()).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_published_events_become_delivered_notifications() {
        let db = TestDatabase::new().await;
        let registry = WorkerRegistry::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (source, publisher) = ChannelEventSource::new(16);
        let config = AlertingConfig::default();
        let consumer = EventConsumer::new(
            Deduplicator::new(db.db_arc(), config.dedup_window()),
            config,
        );
        let source: Arc<dyn EventSource> = Arc::new(source);
        let consumer_task = tokio::spawn(consumer.run(
            source,
            shutdown_rx.clone(),
            registry.register("event-consumer"),
        ));

        let email = RecordingChannel::new(ChannelKind::Email);
        let sms = RecordingChannel::new(ChannelKind::Sms);
        let notifications = NotificationConfig {
            poll_interval_seconds: 1,
            ..Default::default()
        };
        let dispatcher = NotificationDispatcher::new(
            db.db_arc(),
            ChannelSet::new()
                .with_channel(email.clone())
                .with_channel(sms.clone()),
            &notifications,
        );
        let dispatcher_task =
            tokio::spawn(dispatcher.run(shutdown_rx, registry.register("dispatcher")));

        let critical = PredictionFactory::critical("p-1", "R-1");
        let medium = PredictionFactory::create("p-2", "R-2", Severity::Medium, 0.9);
        publisher.publish(PredictionFactory::payload(&critical)).await.unwrap();
        publisher.publish(PredictionFactory::payload(&medium)).await.unwrap();
        publisher
            .publish(serde_json::json!({"eventType": "prediction_completed"}))
            .await
            .unwrap();
        // Replay of the first event
        publisher.publish(PredictionFactory::payload(&critical)).await.unwrap();

        assert!(eventually(|| async { email.sent().len() == 1 && sms.sent().len() == 1 }).await);
        assert!(registry.all_running());
        assert_eq!(alerts(db.db()).await, 1);

        let alert = db.db().list_alerts(&AlertFilter::default()).await.unwrap().remove(0);
        let jobs = db.db().list_notification_jobs(&alert.id).await.unwrap();
        assert!(jobs.iter().all(|j| j.status == JobStatus::Delivered));

        shutdown_tx.send(true).unwrap();
        consumer_task.await.unwrap();
        dispatcher_task.await.unwrap();
        assert_eq!(registry.state("event-consumer"), Some(WorkerState::Stopped));
        assert_eq!(registry.state("dispatcher"), Some(WorkerState::Stopped));
    }
}
