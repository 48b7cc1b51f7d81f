//! Daily summary handed to the reporting collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Alerts created in the period
    pub total_alerts: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    /// Notification jobs created in the period, by status
    pub notifications: BTreeMap<String, u64>,
    pub escalations: u64,
    /// CRITICAL alerts still ACTIVE at the end of the period
    pub open_critical: u64,
    pub generated_at: DateTime<Utc>,
}
