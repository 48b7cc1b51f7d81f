//! Inference collaborator configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the prediction service; `alerts/generate` is disabled without it
    pub url: Option<String>,
    #[serde(default = "default_external_timeout")]
    pub timeout_seconds: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_external_timeout(),
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
