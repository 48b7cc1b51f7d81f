//! Configuration data models
//!
//! This module defines all configuration structures used throughout the engine.

#![allow(missing_docs)]

pub mod alerting;
pub mod engine;
pub mod inference;
pub mod logging;
pub mod maintenance;
pub mod notification;
pub mod scheduler;
pub mod server;
pub mod storage;

pub use alerting::*;
pub use engine::*;
pub use inference::*;
pub use logging::*;
pub use maintenance::*;
pub use notification::*;
pub use scheduler::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

pub fn default_true() -> bool {
    true
}

pub fn default_database_url() -> String {
    "sqlite://data/alerts.db?mode=rwc".to_string()
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_probability_floor() -> f64 {
    0.6
}

pub fn default_dedup_window_minutes() -> u64 {
    60
}

pub fn default_event_buffer() -> usize {
    1024
}

pub fn default_notification_timeout() -> u64 {
    5
}

pub fn default_notification_max_attempts() -> u32 {
    5
}

pub fn default_base_backoff() -> u64 {
    30
}

pub fn default_max_backoff() -> u64 {
    3600
}

pub fn default_poll_interval() -> u64 {
    5
}

pub fn default_batch_size() -> u64 {
    50
}

pub fn default_lease_seconds() -> u64 {
    60
}

pub fn default_escalation_interval() -> u64 {
    300
}

pub fn default_report_time() -> String {
    "08:00".to_string()
}

pub fn default_cleanup_time() -> String {
    "02:00".to_string()
}

pub fn default_retention_days() -> u32 {
    90
}

pub fn default_cleanup_batch_size() -> u64 {
    500
}

pub fn default_cleanup_max_batches() -> u32 {
    20
}

pub fn default_external_timeout() -> u64 {
    10
}
