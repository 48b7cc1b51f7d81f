//! Configuration management for the alert engine
//!
//! Configuration is read from YAML, overlaid with environment variables,
//! and validated once at startup.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{EngineError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the engine
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Engine configuration
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut engine = Self::parse_yaml(&content)?;
        engine.apply_env_overrides(std::env::vars())?;

        let config = Self { engine };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut engine = EngineConfig::default();
        engine.apply_env_overrides(std::env::vars())?;

        let config = Self { engine };
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without touching the environment
    pub fn parse_yaml(content: &str) -> Result<EngineConfig> {
        serde_yaml::from_str(content)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn server(&self) -> &ServerConfig {
        &self.engine.server
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.engine.storage
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.engine.logging
    }

    pub fn alerting(&self) -> &AlertingConfig {
        &self.engine.alerting
    }

    pub fn notifications(&self) -> &NotificationConfig {
        &self.engine.notifications
    }

    pub fn scheduler(&self) -> &SchedulerConfig {
        &self.engine.scheduler
    }

    pub fn maintenance(&self) -> &MaintenanceConfig {
        &self.engine.maintenance
    }

    pub fn inference(&self) -> &InferenceConfig {
        &self.engine.inference
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.engine.validate().map_err(EngineError::Config)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.engine)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
