//! SLA escalation of unacknowledged CRITICAL alerts

use crate::config::EscalationTier;
use crate::core::maintenance::MaintenanceScheduler;
use crate::core::models::{Alert, ChannelKind};
use crate::storage::database::{Database, EscalationOutcome, EscalationRequest};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// Alerts loaded per page; a sweep walks every page
const CANDIDATE_PAGE_SIZE: u64 = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationSummary {
    pub examined: usize,
    pub escalated: usize,
    pub tasks_created: usize,
    /// Highest breached tier already recorded, or recorded concurrently
    pub already_escalated: usize,
    /// Acknowledged or resolved since selection
    pub no_longer_active: usize,
}

#[derive(Debug, Clone)]
pub struct EscalationJob {
    store: Arc<Database>,
    tiers: Vec<EscalationTier>,
    channel: ChannelKind,
    maintenance: Option<MaintenanceScheduler>,
    page_size: u64,
}

impl EscalationJob {
    /// `tiers` must be ascending. Pass `maintenance` to open an EMERGENCY
    /// task on each alert's first escalation.
    pub fn new(
        store: Arc<Database>,
        tiers: Vec<EscalationTier>,
        channel: ChannelKind,
        maintenance: Option<MaintenanceScheduler>,
    ) -> Self {
        Self {
            store,
            tiers,
            channel,
            maintenance,
            page_size: CANDIDATE_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Highest tier `alert` has breached at `now`
    pub fn breached_tier(&self, alert: &Alert, now: DateTime<Utc>) -> Option<&EscalationTier> {
        let age = alert.age(now);
        self.tiers.iter().rev().find(|tier| age >= tier.threshold())
    }

    /// One sweep. Only the highest breached tier is issued, so a long outage
    /// does not produce a burst of catch-up escalations.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<EscalationSummary> {
        let mut summary = EscalationSummary::default();
        let Some(first) = self.tiers.first() else {
            return Ok(summary);
        };

        // Keyset paging: alerts already escalated to their highest tier stay
        // ACTIVE and must not hide newer ones behind a fixed window
        let cutoff = now - first.threshold();
        let mut last: Option<Alert> = None;
        loop {
            let page = self
                .store
                .escalation_candidates(cutoff, last.as_ref(), self.page_size)
                .await?;
            let full = page.len() as u64 == self.page_size;

            for alert in &page {
                summary.examined += 1;
                match self.escalate(alert, now).await {
                    Ok(Some(EscalationOutcome::Escalated { task, .. })) => {
                        summary.escalated += 1;
                        if task.is_some() {
                            summary.tasks_created += 1;
                        }
                    }
                    Ok(Some(EscalationOutcome::AlreadyEscalated)) | Ok(None) => {
                        summary.already_escalated += 1
                    }
                    Ok(Some(EscalationOutcome::NoLongerActive)) => summary.no_longer_active += 1,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => warn!(alert_id = %alert.id, "Escalation failed: {}", e),
                }
            }

            match page.into_iter().last() {
                Some(alert) if full => last = Some(alert),
                _ => break,
            }
            tokio::task::yield_now().await;
        }

        if summary.escalated > 0 {
            debug!(?summary, "Escalation sweep finished");
        }
        Ok(summary)
    }

    async fn escalate(&self, alert: &Alert, now: DateTime<Utc>) -> Result<Option<EscalationOutcome>> {
        let Some(tier) = self.breached_tier(alert, now) else {
            return Ok(None);
        };

        let recorded = self.store.escalated_tiers(&alert.id).await?;
        if recorded.iter().any(|name| name == &tier.name) {
            return Ok(None);
        }

        let task = match &self.maintenance {
            Some(maintenance) if recorded.is_empty() => Some(maintenance.escalation_task(alert, now)),
            _ => None,
        };

        let outcome = self
            .store
            .record_escalation(EscalationRequest {
                alert_id: &alert.id,
                tier,
                channel: self.channel,
                task,
                now,
            })
            .await?;
        Ok(Some(outcome))
    }
}
