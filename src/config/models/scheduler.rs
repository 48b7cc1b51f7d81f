//! Scheduler configuration

use super::*;
use crate::core::models::ChannelKind;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// An SLA tier for unacknowledged CRITICAL alerts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationTier {
    /// Stable label stored with each escalation (`15m`, `1h`, ...)
    pub name: String,
    /// Age of the alert at which this tier is breached
    pub after_minutes: u64,
}

impl EscalationTier {
    pub fn new<S: Into<String>>(name: S, after_minutes: u64) -> Self {
        Self {
            name: name.into(),
            after_minutes,
        }
    }

    pub fn threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.after_minutes as i64)
    }
}

/// Where the daily report goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    #[default]
    Log,
    Webhook,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub mode: ReportMode,
    pub url: Option<String>,
    #[serde(default = "default_external_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mode: ReportMode::Log,
            url: None,
            timeout_seconds: default_external_timeout(),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between escalation sweeps
    #[serde(default = "default_escalation_interval")]
    pub escalation_interval_seconds: u64,
    /// SLA tiers, ascending
    #[serde(default = "default_escalation_tiers")]
    pub escalation_tiers: Vec<EscalationTier>,
    /// Channel used for escalation notifications
    #[serde(default = "default_escalation_channel")]
    pub escalation_channel: ChannelKind,
    /// Open an EMERGENCY maintenance task on the first escalation
    #[serde(default = "default_true")]
    pub create_maintenance_task_on_escalation: bool,
    /// Daily report time, `HH:MM` UTC
    #[serde(default = "default_report_time")]
    pub daily_report_time: String,
    #[serde(default)]
    pub report: ReportConfig,
    /// Daily cleanup time, `HH:MM` UTC
    #[serde(default = "default_cleanup_time")]
    pub cleanup_time: String,
    /// RESOLVED alerts older than this are purged
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_cleanup_batch_size")]
    pub cleanup_batch_size: u64,
    /// Upper bound on batches per cleanup run
    #[serde(default = "default_cleanup_max_batches")]
    pub cleanup_max_batches: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            escalation_interval_seconds: default_escalation_interval(),
            escalation_tiers: default_escalation_tiers(),
            escalation_channel: default_escalation_channel(),
            create_maintenance_task_on_escalation: true,
            daily_report_time: default_report_time(),
            report: ReportConfig::default(),
            cleanup_time: default_cleanup_time(),
            retention_days: default_retention_days(),
            cleanup_batch_size: default_cleanup_batch_size(),
            cleanup_max_batches: default_cleanup_max_batches(),
        }
    }
}

impl SchedulerConfig {
    pub fn report_time(&self) -> Result<NaiveTime, String> {
        parse_time_of_day(&self.daily_report_time)
    }

    pub fn cleanup_at(&self) -> Result<NaiveTime, String> {
        parse_time_of_day(&self.cleanup_time)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days as i64)
    }
}

/// Parse `HH:MM` into a time of day
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| format!("Invalid time of day '{}': {}", value, e))
}

fn default_escalation_tiers() -> Vec<EscalationTier> {
    vec![
        EscalationTier::new("15m", 15),
        EscalationTier::new("1h", 60),
        EscalationTier::new("4h", 240),
    ]
}

fn default_escalation_channel() -> ChannelKind {
    ChannelKind::Email
}
