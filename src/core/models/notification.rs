//! Notification job model

use super::alert::Severity;
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
        }
    }

    /// Channels notified when an alert of `severity` is accepted
    pub fn route(severity: Severity) -> &'static [ChannelKind] {
        match severity {
            Severity::Critical => &[ChannelKind::Email, ChannelKind::Sms],
            Severity::High => &[ChannelKind::Email],
            Severity::Medium | Severity::Low => &[],
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(ChannelKind::Email),
            "sms" => Ok(ChannelKind::Sms),
            _ => Err(EngineError::validation(format!("Unknown channel: {}", s))),
        }
    }
}

/// Delivery state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Delivered,
    FailedPermanent,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Delivered => "DELIVERED",
            JobStatus::FailedPermanent => "FAILED_PERMANENT",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "DELIVERED" => Ok(JobStatus::Delivered),
            "FAILED_PERMANENT" => Ok(JobStatus::FailedPermanent),
            _ => Err(EngineError::validation(format!("Unknown job status: {}", s))),
        }
    }
}

/// Why a job exists. Together with alert and channel it forms the job's
/// idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchKey {
    Initial,
    Escalation(String),
}

impl DispatchKey {
    pub fn encode(&self) -> String {
        match self {
            DispatchKey::Initial => "initial".to_string(),
            DispatchKey::Escalation(tier) => format!("escalation:{}", tier),
        }
    }

    pub fn is_escalation(&self) -> bool {
        matches!(self, DispatchKey::Escalation(_))
    }
}

/// A unit of asynchronous delivery work for one alert and one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationJob {
    pub id: String,
    pub alert_id: String,
    pub channel: ChannelKind,
    pub dispatch_key: String,
    pub escalation: bool,
    pub attempt: u32,
    pub status: JobStatus,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_policy() {
        assert_eq!(
            ChannelKind::route(Severity::Critical),
            &[ChannelKind::Email, ChannelKind::Sms]
        );
        assert_eq!(ChannelKind::route(Severity::High), &[ChannelKind::Email]);
        assert!(ChannelKind::route(Severity::Medium).is_empty());
    }

    #[test]
    fn test_dispatch_key_encoding() {
        assert_eq!(DispatchKey::Initial.encode(), "initial");
        assert_eq!(
            DispatchKey::Escalation("1h".to_string()).encode(),
            "escalation:1h"
        );
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Delivered.is_terminal());
        assert!(JobStatus::FailedPermanent.is_terminal());
        assert_eq!(
            "FAILED_PERMANENT".parse::<JobStatus>().unwrap(),
            JobStatus::FailedPermanent
        );
    }
}
