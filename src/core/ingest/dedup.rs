//! Time-windowed duplicate suppression

use crate::core::models::{Alert, CandidateAlert, ChannelKind};
use crate::storage::database::{AdmissionOutcome, AlertAdmission, Database, OpenAlertDecision};
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Admission attempts when a concurrent writer wins the key
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Accepts or suppresses candidates per (equipment, severity)
#[derive(Debug, Clone)]
pub struct Deduplicator {
    store: Arc<Database>,
    window: chrono::Duration,
}

impl Deduplicator {
    pub fn new(store: Arc<Database>, window: chrono::Duration) -> Self {
        Self { store, window }
    }

    pub fn window(&self) -> chrono::Duration {
        self.window
    }

    /// An open alert created less than one window ago suppresses the candidate
    pub fn decide(&self, open: &Alert, now: DateTime<Utc>) -> OpenAlertDecision {
        if now - open.created_at < self.window {
            OpenAlertDecision::Suppress
        } else {
            OpenAlertDecision::Supersede
        }
    }

    /// Persist the candidate with its routed notification jobs, or suppress it.
    ///
    /// Alert and jobs commit together. Losing a race on the key re-runs the
    /// decision against the winner.
    pub async fn admit(
        &self,
        candidate: &CandidateAlert,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<AdmissionOutcome> {
        let channels = ChannelKind::route(candidate.severity);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let admission = AlertAdmission {
                candidate,
                channels,
                source,
                now,
            };
            match self
                .store
                .admit_alert(admission, |open| self.decide(open, now))
                .await
            {
                Err(EngineError::Conflict(reason)) if attempt < MAX_CONFLICT_RETRIES => {
                    debug!(
                        equipment_id = %candidate.equipment_id,
                        severity = %candidate.severity,
                        attempt,
                        "Admission conflict, retrying: {}",
                        reason
                    );
                }
                other => return other,
            }
        }
    }
}
