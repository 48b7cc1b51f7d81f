//! Retention cleanup

use crate::storage::database::Database;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub deleted: u64,
    pub batches: u32,
    /// Stopped at the batch cap with more rows possibly left
    pub truncated: bool,
}

/// Deletes RESOLVED alerts past the retention horizon, one short
/// transaction per batch
#[derive(Debug, Clone)]
pub struct CleanupJob {
    store: Arc<Database>,
    retention: chrono::Duration,
    batch_size: u64,
    max_batches: u32,
}

impl CleanupJob {
    pub fn new(
        store: Arc<Database>,
        retention: chrono::Duration,
        batch_size: u64,
        max_batches: u32,
    ) -> Self {
        Self {
            store,
            retention,
            batch_size: batch_size.max(1),
            max_batches: max_batches.max(1),
        }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<CleanupSummary> {
        let cutoff = now - self.retention;
        let mut summary = CleanupSummary::default();

        while summary.batches < self.max_batches {
            let deleted = self
                .store
                .purge_resolved_alerts_batch(cutoff, self.batch_size)
                .await?;
            summary.batches += 1;
            summary.deleted += deleted;
            if deleted < self.batch_size {
                break;
            }
            if summary.batches == self.max_batches {
                summary.truncated = true;
            }
            // Let other store users in between batches
            tokio::task::yield_now().await;
        }

        info!(
            deleted = summary.deleted,
            batches = summary.batches,
            truncated = summary.truncated,
            cutoff = %cutoff,
            "Retention cleanup finished"
        );
        Ok(summary)
    }
}
