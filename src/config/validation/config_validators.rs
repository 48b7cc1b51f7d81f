//! Core configuration validators
//!
//! Validation for EngineConfig, ServerConfig, StorageConfig and LoggingConfig.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating engine configuration");

        self.server.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        self.alerting.validate()?;
        self.notifications.validate()?;
        self.scheduler.validate()?;
        self.maintenance.validate()?;
        self.inference.validate()?;

        debug!("Engine configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Server workers must be greater than 0".to_string());
            }
        }

        self.cors.warn_if_permissive();
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate()
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if !supported.iter().any(|prefix| self.url.starts_with(prefix)) {
            return Err(format!(
                "Unsupported database URL '{}'. Supported schemes: {:?}",
                self.url, supported
            ));
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.url.contains(":memory:") && self.max_connections != 1 {
            return Err("In-memory SQLite requires exactly one connection".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let levels = ["trace", "debug", "info", "warn", "error"];
        if !levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Expected one of {:?}",
                self.level, levels
            ));
        }
        Ok(())
    }
}
