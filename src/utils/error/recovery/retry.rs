//! Retry mechanism with exponential backoff

use super::types::RetryConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry mechanism with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `f`, retrying every error
    pub async fn call<F, Fut, R, E>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
    {
        self.call_if(f, |_| true).await
    }

    /// Execute `f`, retrying only errors accepted by `should_retry`
    pub async fn call_if<F, Fut, R, E, P>(&self, mut f: F, should_retry: P) -> std::result::Result<R, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !should_retry(&error) || self.config.is_exhausted(attempt) {
                        if attempt > 1 {
                            warn!("Giving up after {} attempts: {}", attempt, error);
                        }
                        return Err(error);
                    }

                    let delay = self.jittered(self.config.delay_for_attempt(attempt));
                    debug!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt, error, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.config.jitter {
            return delay;
        }
        let jitter_factor = 0.1;
        let jitter = delay.as_millis() as f64 * jitter_factor * (rand::random::<f64>() - 0.5);
        Duration::from_millis((delay.as_millis() as f64 + jitter).max(0.0) as u64)
    }
}
