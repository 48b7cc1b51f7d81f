//! Prediction events consumed from the inference stage

use super::alert::{Confidence, Severity};
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The only event type this engine acts on
pub const PREDICTION_COMPLETED: &str = "prediction_completed";

const MAX_EQUIPMENT_ID_LEN: usize = 100;

/// `prediction_completed` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionEvent {
    #[serde(default = "default_event_type")]
    pub event_type: String,
    pub prediction_id: String,
    pub equipment_id: String,
    pub timestamp: DateTime<Utc>,
    pub failure_probability: f64,
    pub health_score: f64,
    pub severity: Severity,
    pub days_until_failure: i32,
    pub confidence: Confidence,
    /// Optional guidance from the model; derived from severity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_action: Option<String>,
}

fn default_event_type() -> String {
    PREDICTION_COMPLETED.to_string()
}

impl PredictionEvent {
    /// Decode a raw bus payload
    pub fn from_value(payload: serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload)
            .map_err(|e| EngineError::validation(format!("Malformed prediction event: {}", e)))
    }

    pub fn is_prediction_completed(&self) -> bool {
        self.event_type == PREDICTION_COMPLETED
    }

    /// Structural checks on field ranges
    pub fn validate(&self) -> Result<()> {
        if self.prediction_id.trim().is_empty() {
            return Err(EngineError::validation("predictionId cannot be empty"));
        }

        let equipment_id = self.equipment_id.trim();
        if equipment_id.is_empty() {
            return Err(EngineError::validation("equipmentId cannot be empty"));
        }
        if equipment_id.len() > MAX_EQUIPMENT_ID_LEN {
            return Err(EngineError::validation(format!(
                "equipmentId exceeds {} characters",
                MAX_EQUIPMENT_ID_LEN
            )));
        }

        if !self.failure_probability.is_finite() || !(0.0..=1.0).contains(&self.failure_probability)
        {
            return Err(EngineError::validation(format!(
                "failureProbability must be within [0, 1], got {}",
                self.failure_probability
            )));
        }

        if !self.health_score.is_finite() || !(0.0..=100.0).contains(&self.health_score) {
            return Err(EngineError::validation(format!(
                "healthScore must be within [0, 100], got {}",
                self.health_score
            )));
        }

        if self.days_until_failure < 0 {
            return Err(EngineError::validation("daysUntilFailure cannot be negative"));
        }

        Ok(())
    }

    /// Build the alert candidate this event would produce
    pub fn to_candidate(&self) -> CandidateAlert {
        CandidateAlert {
            prediction_id: self.prediction_id.trim().to_string(),
            equipment_id: self.equipment_id.trim().to_string(),
            severity: self.severity,
            failure_probability: self.failure_probability,
            health_score: self.health_score,
            days_until_failure: self.days_until_failure,
            confidence: self.confidence,
            recommended_action: self
                .recommended_action
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| self.severity.recommended_action().to_string()),
        }
    }
}

/// An alert that has passed filtering and awaits the dedup decision
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAlert {
    pub prediction_id: String,
    pub equipment_id: String,
    pub severity: Severity,
    pub failure_probability: f64,
    pub health_score: f64,
    pub days_until_failure: i32,
    pub confidence: Confidence,
    pub recommended_action: String,
}
