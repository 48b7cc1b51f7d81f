//! Environment variable overrides
//!
//! Variables are taken from an iterator so callers (and tests) decide where
//! they come from.

use super::models::*;
use crate::utils::error::{EngineError, Result};
use std::str::FromStr;
use tracing::debug;

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| EngineError::Config(format!("Invalid value for {}: {}", key, e)))
}

impl EngineConfig {
    /// Apply recognised `KEY=value` pairs on top of the current values
    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "ENGINE_HOST" => self.server.host = value.to_string(),
                "ENGINE_PORT" => self.server.port = parse(key, value)?,
                "ENGINE_WORKERS" => self.server.workers = Some(parse(key, value)?),
                "DATABASE_URL" => self.storage.database.url = value.to_string(),
                "DATABASE_MAX_CONNECTIONS" => {
                    self.storage.database.max_connections = parse(key, value)?
                }
                "LOG_LEVEL" => self.logging.level = value.to_string(),
                "LOG_FORMAT" => {
                    self.logging.format = match value.to_lowercase().as_str() {
                        "json" => LogFormat::Json,
                        "text" => LogFormat::Text,
                        other => {
                            return Err(EngineError::Config(format!(
                                "Invalid value for LOG_FORMAT: {}",
                                other
                            )));
                        }
                    }
                }
                "ALERT_PROBABILITY_FLOOR" => self.alerting.probability_floor = parse(key, value)?,
                "ALERT_CRITICAL_PROBABILITY_FLOOR" => {
                    self.alerting.critical_probability_floor = parse(key, value)?
                }
                "DEDUP_WINDOW_MINUTES" => self.alerting.dedup_window_minutes = parse(key, value)?,
                "NOTIFICATION_MAX_ATTEMPTS" => {
                    self.notifications.max_attempts = parse(key, value)?
                }
                "NOTIFICATION_TIMEOUT_SECONDS" => {
                    self.notifications.timeout_seconds = parse(key, value)?
                }
                "EMAIL_RELAY_URL" => {
                    self.notifications.email.mode = ChannelMode::Relay;
                    self.notifications.email.relay_url = Some(value.to_string());
                }
                "SMS_RELAY_URL" => {
                    self.notifications.sms.mode = ChannelMode::Relay;
                    self.notifications.sms.relay_url = Some(value.to_string());
                }
                "RETENTION_DAYS" => self.scheduler.retention_days = parse(key, value)?,
                "AUTO_CREATE_TASKS" => {
                    self.scheduler.create_maintenance_task_on_escalation = parse(key, value)?
                }
                "INFERENCE_URL" => self.inference.url = Some(value.to_string()),
                _ => continue,
            }
            debug!("Applied environment override {}", key);
        }
        Ok(())
    }
}
