//! Scheduler, maintenance and inference validators

use super::trait_def::Validate;
use super::validate_http_url;
use crate::config::models::*;
use std::collections::HashSet;

impl Validate for SchedulerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.escalation_interval_seconds == 0 {
            return Err("escalation_interval_seconds must be greater than 0".to_string());
        }

        if self.escalation_tiers.is_empty() {
            return Err("At least one escalation tier must be configured".to_string());
        }

        let mut names = HashSet::new();
        let mut previous = 0;
        for tier in &self.escalation_tiers {
            if tier.name.trim().is_empty() {
                return Err("Escalation tier names cannot be empty".to_string());
            }
            if !names.insert(tier.name.as_str()) {
                return Err(format!("Duplicate escalation tier: {}", tier.name));
            }
            if tier.after_minutes == 0 || tier.after_minutes <= previous {
                return Err(format!(
                    "Escalation tiers must be strictly ascending and positive (tier {})",
                    tier.name
                ));
            }
            previous = tier.after_minutes;
        }

        self.report_time()?;
        self.cleanup_at()?;

        if self.report.mode == ReportMode::Webhook {
            match &self.report.url {
                Some(url) => validate_http_url("report.url", url)?,
                None => return Err("webhook report mode requires report.url".to_string()),
            }
        }

        if self.retention_days == 0 {
            return Err("retention_days must be greater than 0".to_string());
        }

        if self.cleanup_batch_size == 0 || self.cleanup_max_batches == 0 {
            return Err("Cleanup batch size and batch count must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for MaintenanceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_task_duration_hours == 0 {
            return Err("default_task_duration_hours must be greater than 0".to_string());
        }
        if self.critical_days > self.high_days
            || self.high_days > self.medium_days
            || self.medium_days > self.low_days
        {
            return Err("Maintenance lead times must not decrease with priority".to_string());
        }
        Ok(())
    }
}

impl Validate for InferenceConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.url {
            validate_http_url("inference.url", url)?;
        }
        if self.timeout_seconds == 0 {
            return Err("Inference timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
