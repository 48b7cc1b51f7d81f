//! HTTP inference client

use crate::config::InferenceConfig;
use crate::core::models::{Confidence, PREDICTION_COMPLETED, PredictionEvent, Severity};
use crate::utils::error::{EngineError, Result};
use crate::utils::new_id;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Named sensor readings for one piece of equipment
pub type Readings = BTreeMap<String, f64>;

#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync + std::fmt::Debug {
    async fn predict(&self, equipment_id: &str, readings: &Readings) -> Result<PredictionEvent>;
}

/// Body returned by the prediction service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub failure_probability: f64,
    pub severity: Severity,
    pub days_until_failure: i32,
    pub health_score: f64,
    pub confidence: Confidence,
    #[serde(default)]
    pub recommended_action: Option<String>,
}

impl PredictionResponse {
    pub fn into_event(self, equipment_id: &str) -> PredictionEvent {
        PredictionEvent {
            event_type: PREDICTION_COMPLETED.to_string(),
            prediction_id: new_id(),
            equipment_id: equipment_id.to_string(),
            timestamp: Utc::now(),
            failure_probability: self.failure_probability,
            health_score: self.health_score,
            severity: self.severity,
            days_until_failure: self.days_until_failure,
            confidence: self.confidence,
            recommended_action: self.recommended_action,
        }
    }
}

/// Calls `POST {base}/api/v1/predict/failure`
#[derive(Debug)]
pub struct HttpInferenceClient {
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpInferenceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = url::Url::parse(base_url)?;
        let endpoint = base.join("api/v1/predict/failure")?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(EngineError::HttpClient)?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            timeout,
            client,
        })
    }

    /// `None` when no inference url is configured
    pub fn from_config(config: &InferenceConfig) -> Result<Option<Self>> {
        config
            .url
            .as_deref()
            .map(|url| Self::new(url, config.timeout()))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, readings: &Readings) -> Result<PredictionResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(readings)
            .send()
            .await
            .map_err(|e| EngineError::inference(format!("Prediction service unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::inference(format!(
                "Prediction service returned status {}: {}",
                status,
                crate::utils::truncate_string(&body, 200)
            )));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| EngineError::inference(format!("Malformed prediction response: {}", e)))
    }
}

#[async_trait::async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn predict(&self, equipment_id: &str, readings: &Readings) -> Result<PredictionEvent> {
        debug!(equipment_id = %equipment_id, endpoint = %self.endpoint, "Requesting prediction");

        let response = tokio::time::timeout(self.timeout, self.call(readings))
            .await
            .map_err(|_| {
                warn!(equipment_id = %equipment_id, "Prediction service timed out");
                EngineError::timeout(format!(
                    "Prediction service did not answer within {:?}",
                    self.timeout
                ))
            })??;

        Ok(response.into_event(equipment_id))
    }
}
