use crate::core::models::{Alert, AlertFilter, AlertStatus};
use crate::storage::database::{AlertTransition, Database};
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_LIST_LIMIT: u64 = 50;
pub const MAX_LIST_LIMIT: u64 = 500;

const MAX_ACTOR_LEN: usize = 100;

/// `acknowledge` / `resolve` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub actor: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransitionRequest {
    pub fn new<S: Into<String>>(actor: S) -> Self {
        Self {
            actor: actor.into(),
            notes: None,
        }
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn validate(&self) -> Result<&str> {
        let actor = self.actor.trim();
        if actor.is_empty() {
            return Err(EngineError::validation("actor cannot be empty"));
        }
        if actor.len() > MAX_ACTOR_LEN {
            return Err(EngineError::validation(format!(
                "actor exceeds {} characters",
                MAX_ACTOR_LEN
            )));
        }
        Ok(actor)
    }
}

/// Reads and transitions alerts
#[derive(Debug, Clone)]
pub struct AlertLifecycle {
    store: Arc<Database>,
}

impl AlertLifecycle {
    pub fn new(store: Arc<Database>) -> Self {
        Self { store }
    }

    pub async fn get(&self, alert_id: &str) -> Result<Alert> {
        self.store
            .get_alert(alert_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("Alert {}", alert_id)))
    }

    /// List with the limit clamped to `1..=MAX_LIST_LIMIT`
    pub async fn list(&self, mut filter: AlertFilter) -> Result<Vec<Alert>> {
        filter.limit = match filter.limit {
            0 => DEFAULT_LIST_LIMIT,
            n => n.min(MAX_LIST_LIMIT),
        };
        self.store.list_alerts(&filter).await
    }

    /// ACTIVE -> ACKNOWLEDGED
    pub async fn acknowledge(
        &self,
        alert_id: &str,
        request: &TransitionRequest,
        now: DateTime<Utc>,
    ) -> Result<Alert> {
        let actor = request.validate()?;
        let alert = self.get(alert_id).await?;
        if !alert.status.can_acknowledge() {
            return Err(EngineError::invalid_state(
                alert_id,
                "acknowledged",
                alert.status.as_str(),
            ));
        }

        let transition = AlertTransition {
            status: Some(AlertStatus::Acknowledged),
            acknowledged_at: Some(now),
            acknowledged_by: Some(actor.to_string()),
            acknowledgement_notes: request.notes.clone(),
            ..Default::default()
        };
        let updated = self
            .apply(&alert, &transition, "acknowledged", AlertStatus::can_acknowledge, now)
            .await?;

        info!(alert_id = %alert_id, actor = %actor, "Alert acknowledged");
        Ok(updated)
    }

    /// ACTIVE or ACKNOWLEDGED -> RESOLVED; sets the acknowledgement if missing
    pub async fn resolve(
        &self,
        alert_id: &str,
        request: &TransitionRequest,
        now: DateTime<Utc>,
    ) -> Result<Alert> {
        let actor = request.validate()?;
        let alert = self.get(alert_id).await?;
        if !alert.status.can_resolve() {
            return Err(EngineError::invalid_state(
                alert_id,
                "resolved",
                alert.status.as_str(),
            ));
        }

        let implicit_ack = alert.acknowledged_at.is_none();
        let transition = AlertTransition {
            status: Some(AlertStatus::Resolved),
            acknowledged_at: implicit_ack.then_some(now),
            acknowledged_by: implicit_ack.then(|| actor.to_string()),
            resolved_at: Some(now),
            resolved_by: Some(actor.to_string()),
            resolution_notes: request.notes.clone(),
            ..Default::default()
        };
        let updated = self
            .apply(&alert, &transition, "resolved", AlertStatus::can_resolve, now)
            .await?;

        info!(alert_id = %alert_id, actor = %actor, implicit_ack, "Alert resolved");
        Ok(updated)
    }

    /// Version-checked write. On a lost race the fresh state decides
    /// between InvalidState and Conflict.
    async fn apply(
        &self,
        alert: &Alert,
        transition: &AlertTransition,
        action: &'static str,
        allowed: fn(&AlertStatus) -> bool,
        now: DateTime<Utc>,
    ) -> Result<Alert> {
        let applied = self
            .store
            .transition_alert(&alert.id, alert.version, transition, now)
            .await?;
        let current = self.get(&alert.id).await?;
        if applied {
            return Ok(current);
        }
        if !allowed(&current.status) {
            return Err(EngineError::invalid_state(
                &alert.id,
                action,
                current.status.as_str(),
            ));
        }
        Err(EngineError::conflict(format!(
            "Alert {} was modified concurrently",
            alert.id
        )))
    }
}
