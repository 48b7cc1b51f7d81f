//! Tests for worker health tracking

use super::*;
use crate::config::{DatabaseConfig, StorageConfig};
use crate::storage::StorageLayer;

#[test]
fn test_registered_worker_starts_not_ready() {
    let registry = WorkerRegistry::new();
    let handle = registry.register("dispatcher");
    assert_eq!(registry.state("dispatcher"), Some(WorkerState::Starting));
    assert!(!registry.all_running());

    handle.running();
    assert!(registry.all_running());
}

#[test]
fn test_failure_survives_stop() {
    let registry = WorkerRegistry::new();
    let handle = registry.register("consumer");
    handle.running();
    handle.failed("store corrupted");
    handle.stopped();

    assert_eq!(registry.failed(), vec!["consumer".to_string()]);
    assert!(matches!(registry.state("consumer"), Some(WorkerState::Failed(_))));
}

#[test]
fn test_clean_stop() {
    let registry = WorkerRegistry::new();
    let handle = registry.register("scheduler");
    handle.running();
    handle.stopped();
    assert_eq!(registry.state("scheduler"), Some(WorkerState::Stopped));
    assert!(registry.failed().is_empty());
}

#[tokio::test]
async fn test_readiness_reports_failed_worker() {
    let storage = StorageLayer::new(&StorageConfig {
        database: DatabaseConfig::in_memory(),
    })
    .await
    .unwrap();
    let registry = WorkerRegistry::new();
    let ok = registry.register("dispatcher");
    let bad = registry.register("consumer");
    ok.running();
    bad.running();

    let checker = HealthChecker::new(storage, registry);
    assert!(checker.check_all().await.ready);

    bad.failed("configuration missing");
    let status = checker.check_all().await;
    assert!(!status.ready);
    assert!(status.database.healthy);
    assert_eq!(status.failed_workers, vec!["consumer".to_string()]);
}
