//! Notification dispatch configuration

use super::*;
use crate::core::models::ChannelKind;
use crate::utils::error::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a channel delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Write the notification to the log only
    #[default]
    Log,
    /// POST the notification to an HTTP relay (mail or SMS gateway)
    Relay,
}

/// Per-channel delivery settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    #[serde(default)]
    pub mode: ChannelMode,
    /// Relay endpoint, required in `relay` mode
    pub relay_url: Option<String>,
    /// Sender address or id passed to the relay
    pub sender: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Notification dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Timeout for a single channel call
    #[serde(default = "default_notification_timeout")]
    pub timeout_seconds: u64,
    /// Attempts before a job becomes FAILED_PERMANENT
    #[serde(default = "default_notification_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_backoff")]
    pub base_backoff_seconds: u64,
    #[serde(default = "default_max_backoff")]
    pub max_backoff_seconds: u64,
    /// How often the dispatcher polls for due jobs
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Jobs claimed per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// How long a claimed job stays invisible to other workers
    #[serde(default = "default_lease_seconds")]
    pub lease_seconds: u64,
    #[serde(default = "default_email_channel")]
    pub email: ChannelConfig,
    #[serde(default)]
    pub sms: ChannelConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_notification_timeout(),
            max_attempts: default_notification_max_attempts(),
            base_backoff_seconds: default_base_backoff(),
            max_backoff_seconds: default_max_backoff(),
            poll_interval_seconds: default_poll_interval(),
            batch_size: default_batch_size(),
            lease_seconds: default_lease_seconds(),
            email: default_email_channel(),
            sms: ChannelConfig::default(),
        }
    }
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Backoff schedule for failed deliveries
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_secs(self.base_backoff_seconds),
            max_delay: Duration::from_secs(self.max_backoff_seconds),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    pub fn channel(&self, kind: ChannelKind) -> &ChannelConfig {
        match kind {
            ChannelKind::Email => &self.email,
            ChannelKind::Sms => &self.sms,
        }
    }
}

fn default_email_channel() -> ChannelConfig {
    ChannelConfig {
        mode: ChannelMode::Log,
        relay_url: None,
        sender: Some("alerts@example.com".to_string()),
        recipients: vec!["maintenance@example.com".to_string()],
    }
}
