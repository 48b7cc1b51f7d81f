//! Tests for retry and backoff

use super::{RetryConfig, RetryPolicy};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

fn notification_backoff() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        base_delay: Duration::from_secs(30),
        max_delay: Duration::from_secs(3600),
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

#[test]
fn test_delay_doubles_from_base() {
    let config = notification_backoff();
    assert_eq!(config.delay_for_attempt(1), Duration::from_secs(30));
    assert_eq!(config.delay_for_attempt(2), Duration::from_secs(60));
    assert_eq!(config.delay_for_attempt(3), Duration::from_secs(120));
    assert_eq!(config.delay_for_attempt(4), Duration::from_secs(240));
}

#[test]
fn test_delay_is_capped() {
    let config = notification_backoff();
    assert_eq!(config.delay_for_attempt(8), Duration::from_secs(3600));
    assert_eq!(config.delay_for_attempt(200), Duration::from_secs(3600));
}

#[test]
fn test_exhaustion() {
    let config = notification_backoff();
    assert!(!config.is_exhausted(4));
    assert!(config.is_exhausted(5));
}

#[tokio::test]
async fn test_retry_policy_eventually_succeeds() {
    let policy = RetryPolicy::new(RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        ..Default::default()
    });

    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let result = policy
        .call(|| {
            let counter = counter_clone.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::Relaxed);
                if count < 2 { Err("not yet") } else { Ok(42) }
            }
        })
        .await;

    assert_eq!(result, Ok(42));
    assert_eq!(counter.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn test_retry_policy_skips_non_retryable() {
    let policy = RetryPolicy::new(RetryConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(1),
        ..Default::default()
    });

    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let result: Result<(), &str> = policy
        .call_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::Relaxed);
                    Err("malformed")
                }
            },
            |e| *e != "malformed",
        )
        .await;

    assert!(result.is_err());
    assert_eq!(counter.load(Ordering::Relaxed), 1);
}
