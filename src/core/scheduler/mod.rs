//! Periodic jobs: escalation, daily report and retention cleanup
//!
//! Each job is safe to run twice in overlapping windows; the store's unique
//! keys and batch predicates make a repeated run a no-op.

mod cleanup;
mod escalation;
mod report;
mod schedule;
mod worker;

pub use cleanup::{CleanupJob, CleanupSummary};
pub use escalation::{EscalationJob, EscalationSummary};
pub use report::{DailyReportJob, LogReportSink, ReportSink, WebhookReportSink, report_sink};
pub use schedule::{duration_until, next_daily_run};
pub use worker::Scheduler;

#[cfg(test)]
mod tests;
