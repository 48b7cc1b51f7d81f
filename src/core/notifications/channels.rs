//! Notification channel implementations

use crate::config::{ChannelConfig, ChannelMode, NotificationConfig};
use crate::core::models::{ChannelKind, Severity};
use crate::utils::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Payload handed to a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub alert_id: String,
    pub equipment_id: String,
    pub severity: Severity,
    pub message: String,
    pub channel: ChannelKind,
}

/// Notification channel trait
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Deliver one message. Any error counts as a failed attempt.
    async fn send(&self, message: &NotificationMessage) -> Result<()>;

    fn kind(&self) -> ChannelKind;

    fn name(&self) -> &str;
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug)]
pub struct LogChannel {
    kind: ChannelKind,
    recipients: Vec<String>,
}

impl LogChannel {
    pub fn new(kind: ChannelKind, recipients: Vec<String>) -> Self {
        Self { kind, recipients }
    }
}

#[async_trait::async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        info!(
            channel = %self.kind,
            alert_id = %message.alert_id,
            equipment_id = %message.equipment_id,
            severity = %message.severity,
            recipients = ?self.recipients,
            "{}",
            message.message
        );
        Ok(())
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// POSTs notifications to a mail or SMS relay
#[derive(Debug)]
pub struct HttpRelayChannel {
    kind: ChannelKind,
    url: String,
    sender: Option<String>,
    recipients: Vec<String>,
    client: reqwest::Client,
}

impl HttpRelayChannel {
    pub fn new(
        kind: ChannelKind,
        url: String,
        sender: Option<String>,
        recipients: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EngineError::HttpClient)?;
        Ok(Self {
            kind,
            url,
            sender,
            recipients,
            client,
        })
    }
}

#[async_trait::async_trait]
impl NotificationChannel for HttpRelayChannel {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let payload = serde_json::json!({
            "alertId": message.alert_id,
            "equipmentId": message.equipment_id,
            "severity": message.severity,
            "message": message.message,
            "channel": message.channel,
            "sender": self.sender,
            "recipients": self.recipients,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EngineError::delivery(format!("{} relay unreachable: {}", self.kind, e)))?;

        if !response.status().is_success() {
            return Err(EngineError::delivery(format!(
                "{} relay returned status: {}",
                self.kind,
                response.status()
            )));
        }

        Ok(())
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn name(&self) -> &str {
        "relay"
    }
}

/// The channel used for each kind
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    channels: HashMap<ChannelKind, Arc<dyn NotificationChannel>>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build log or relay channels as configured
    pub fn from_config(config: &NotificationConfig) -> Result<Self> {
        let mut set = Self::new();
        for kind in [ChannelKind::Email, ChannelKind::Sms] {
            set = set.with_channel(build_channel(kind, config.channel(kind), config.timeout())?);
        }
        Ok(set)
    }

    /// Register `channel` for its kind, replacing any previous one
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.insert(channel.kind(), channel);
        self
    }

    pub fn get(&self, kind: ChannelKind) -> Option<&Arc<dyn NotificationChannel>> {
        self.channels.get(&kind)
    }
}

fn build_channel(
    kind: ChannelKind,
    config: &ChannelConfig,
    timeout: Duration,
) -> Result<Arc<dyn NotificationChannel>> {
    match config.mode {
        ChannelMode::Log => Ok(Arc::new(LogChannel::new(kind, config.recipients.clone()))),
        ChannelMode::Relay => {
            let url = config.relay_url.clone().ok_or_else(|| {
                EngineError::config(format!("{} channel in relay mode needs relay_url", kind))
            })?;
            Ok(Arc::new(HttpRelayChannel::new(
                kind,
                url,
                config.sender.clone(),
                config.recipients.clone(),
                timeout,
            )?))
        }
    }
}
