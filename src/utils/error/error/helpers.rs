//! Helper functions for creating and classifying errors

use super::types::EngineError;

impl EngineError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn corruption<S: Into<String>>(message: S) -> Self {
        Self::Corruption(message.into())
    }

    pub fn store_unavailable<S: Into<String>>(message: S) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn delivery<S: Into<String>>(message: S) -> Self {
        Self::NotificationDelivery(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn inference<S: Into<String>>(message: S) -> Self {
        Self::Inference(message.into())
    }

    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn invalid_state<A: Into<String>, S: Into<String>>(
        alert_id: A,
        action: &'static str,
        status: S,
    ) -> Self {
        Self::InvalidState {
            alert_id: alert_id.into(),
            action,
            status: status.into(),
        }
    }

    /// Transient failures that a caller or redelivery may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Database(_)
                | EngineError::StoreUnavailable(_)
                | EngineError::Conflict(_)
                | EngineError::Timeout(_)
                | EngineError::HttpClient(_)
                | EngineError::NotificationDelivery(_)
        )
    }

    /// Conditions that must stop the affected worker.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Config(_) | EngineError::Corruption(_))
    }
}
