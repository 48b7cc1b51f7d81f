//! Alert model and lifecycle states

use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predicted failure severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }

    /// Only HIGH and CRITICAL predictions become alerts
    pub fn warrants_alert(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Default operator guidance for this severity
    pub fn recommended_action(&self) -> &'static str {
        match self {
            Severity::Critical => {
                "Schedule immediate maintenance - equipment likely to fail within 7 days"
            }
            Severity::High => {
                "Schedule maintenance within 2 weeks - equipment showing signs of degradation"
            }
            Severity::Medium => "Plan maintenance within next month - monitor equipment closely",
            Severity::Low => "Continue normal operation - routine maintenance as scheduled",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            _ => Err(EngineError::validation(format!("Unknown severity: {}", s))),
        }
    }
}

/// Alert lifecycle state
///
/// ACTIVE -> ACKNOWLEDGED -> RESOLVED, with ACTIVE -> RESOLVED allowed
/// (implicit acknowledgement). RESOLVED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [
        AlertStatus::Active,
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "ACTIVE",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
        }
    }

    /// ACTIVE or ACKNOWLEDGED
    pub fn is_open(&self) -> bool {
        !matches!(self, AlertStatus::Resolved)
    }

    pub fn can_acknowledge(&self) -> bool {
        matches!(self, AlertStatus::Active)
    }

    pub fn can_resolve(&self) -> bool {
        self.is_open()
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(AlertStatus::Active),
            "ACKNOWLEDGED" => Ok(AlertStatus::Acknowledged),
            "RESOLVED" => Ok(AlertStatus::Resolved),
            _ => Err(EngineError::validation(format!("Unknown alert status: {}", s))),
        }
    }
}

/// Confidence label attached by the inference stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl FromStr for Confidence {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Confidence::High),
            "medium" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            _ => Err(EngineError::validation(format!("Unknown confidence: {}", s))),
        }
    }
}

/// `source` of alerts raised from prediction events
pub const ALERT_SOURCE_PREDICTION: &str = "ml_prediction";

/// Key under which at most one open alert may exist
pub fn dedup_key(equipment_id: &str, severity: Severity) -> String {
    format!("{}:{}", equipment_id, severity.as_str())
}

/// A persisted alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub equipment_id: String,
    pub severity: Severity,
    pub failure_probability: f64,
    pub health_score: f64,
    pub days_until_failure: i32,
    pub confidence: Confidence,
    pub status: AlertStatus,
    pub recommended_action: String,
    pub source: String,
    pub source_prediction_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub acknowledgement_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution_notes: Option<String>,
    /// Optimistic concurrency counter
    pub version: i32,
}

impl Alert {
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.equipment_id, self.severity)
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }

    /// One-line human summary used in notifications
    pub fn summary(&self) -> String {
        format!(
            "{} alert for equipment {}: failure probability {:.0}%, health score {:.1}, ~{} days until failure. {}",
            self.severity,
            self.equipment_id,
            self.failure_probability * 100.0,
            self.health_score,
            self.days_until_failure,
            self.recommended_action
        )
    }
}

/// Query over the alert store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub equipment_id: Option<String>,
    pub status: Option<AlertStatus>,
    pub severity: Option<Severity>,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("SEVERE".parse::<Severity>().is_err());
    }

    #[test]
    fn test_only_high_and_critical_warrant_alerts() {
        assert!(Severity::Critical.warrants_alert());
        assert!(Severity::High.warrants_alert());
        assert!(!Severity::Medium.warrants_alert());
        assert!(!Severity::Low.warrants_alert());
    }

    #[test]
    fn test_transition_guards() {
        assert!(AlertStatus::Active.can_acknowledge());
        assert!(!AlertStatus::Acknowledged.can_acknowledge());
        assert!(!AlertStatus::Resolved.can_acknowledge());

        assert!(AlertStatus::Active.can_resolve());
        assert!(AlertStatus::Acknowledged.can_resolve());
        assert!(!AlertStatus::Resolved.can_resolve());
    }

    #[test]
    fn test_dedup_key_includes_severity() {
        assert_ne!(
            dedup_key("R-1", Severity::Critical),
            dedup_key("R-1", Severity::High)
        );
        assert_eq!(dedup_key("R-1", Severity::High), "R-1:HIGH");
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&AlertStatus::Acknowledged).unwrap();
        assert_eq!(json, "\"ACKNOWLEDGED\"");
    }
}
