//! Alerting and notification validators

use super::trait_def::Validate;
use super::validate_http_url;
use crate::config::models::*;

impl Validate for AlertingConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, floor) in [
            ("probability_floor", self.probability_floor),
            ("critical_probability_floor", self.critical_probability_floor),
        ] {
            if !(0.0..=1.0).contains(&floor) {
                return Err(format!("{} must be within [0, 1], got {}", name, floor));
            }
        }

        if self.dedup_window_minutes == 0 {
            return Err("dedup_window_minutes must be greater than 0".to_string());
        }

        if self.event_buffer == 0 {
            return Err("event_buffer must be greater than 0".to_string());
        }

        if self.store_retry.max_attempts == 0 {
            return Err("store_retry.max_attempts must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("Notification timeout must be greater than 0".to_string());
        }

        if self.max_attempts == 0 {
            return Err("Notification max_attempts must be greater than 0".to_string());
        }

        if self.base_backoff_seconds == 0 {
            return Err("base_backoff_seconds must be greater than 0".to_string());
        }

        if self.max_backoff_seconds < self.base_backoff_seconds {
            return Err("max_backoff_seconds cannot be lower than base_backoff_seconds".to_string());
        }

        if self.poll_interval_seconds == 0 || self.batch_size == 0 {
            return Err("Dispatcher poll interval and batch size must be greater than 0".to_string());
        }

        if self.lease_seconds <= self.timeout_seconds {
            return Err("lease_seconds must exceed the channel timeout".to_string());
        }

        self.email
            .validate()
            .map_err(|e| format!("email channel: {}", e))?;
        self.sms.validate().map_err(|e| format!("sms channel: {}", e))?;

        Ok(())
    }
}

impl Validate for ChannelConfig {
    fn validate(&self) -> Result<(), String> {
        if self.mode == ChannelMode::Relay {
            match &self.relay_url {
                Some(url) => validate_http_url("relay_url", url)?,
                None => return Err("relay mode requires relay_url".to_string()),
            }
        }
        Ok(())
    }
}
