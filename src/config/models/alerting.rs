//! Alert admission configuration

use super::*;
use crate::core::models::Severity;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds and windows applied to incoming prediction events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Minimum failure probability for HIGH events
    #[serde(default = "default_probability_floor")]
    pub probability_floor: f64,
    /// Minimum failure probability for CRITICAL events
    #[serde(default = "default_probability_floor")]
    pub critical_probability_floor: f64,
    /// Suppression window per (equipment, severity)
    #[serde(default = "default_dedup_window_minutes")]
    pub dedup_window_minutes: u64,
    /// Capacity of the in-process event bus
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Retry policy for transient store failures while ingesting
    #[serde(default)]
    pub store_retry: StoreRetryConfig,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            probability_floor: default_probability_floor(),
            critical_probability_floor: default_probability_floor(),
            dedup_window_minutes: default_dedup_window_minutes(),
            event_buffer: default_event_buffer(),
            store_retry: StoreRetryConfig::default(),
        }
    }
}

impl AlertingConfig {
    pub fn dedup_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.dedup_window_minutes as i64)
    }

    /// Probability floor that applies to an event of `severity`
    pub fn floor_for(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical_probability_floor,
            _ => self.probability_floor,
        }
    }
}

/// In-process retry for store writes during ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRetryConfig {
    #[serde(default = "default_store_retry_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_store_retry_base_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_store_retry_max_ms")]
    pub max_delay_ms: u64,
}

impl Default for StoreRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_store_retry_attempts(),
            base_delay_ms: default_store_retry_base_ms(),
            max_delay_ms: default_store_retry_max_ms(),
        }
    }
}

impl StoreRetryConfig {
    pub fn retry_config(&self) -> crate::utils::error::RetryConfig {
        crate::utils::error::RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

fn default_store_retry_attempts() -> u32 {
    5
}

fn default_store_retry_base_ms() -> u64 {
    200
}

fn default_store_retry_max_ms() -> u64 {
    5_000
}
