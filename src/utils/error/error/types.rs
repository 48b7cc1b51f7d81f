//! Error types for the alert engine

use thiserror::Error;

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The alert store could not be reached or refused the operation
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored data could not be interpreted
    #[error("Store corruption: {0}")]
    Corruption(String),

    /// Malformed input (events, API payloads)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal lifecycle transition
    #[error("Alert {alert_id} cannot be {action} while {status}")]
    InvalidState {
        alert_id: String,
        action: &'static str,
        status: String,
    },

    /// Optimistic concurrency check lost to another writer
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// A notification channel rejected or failed a delivery
    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Inference collaborator errors
    #[error("Inference error: {0}")]
    Inference(String),

    /// Reporting collaborator errors
    #[error("Report error: {0}")]
    Report(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
