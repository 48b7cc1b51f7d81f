//! Daily summary

use crate::config::{ReportConfig, ReportMode};
use crate::core::models::DailyReport;
use crate::storage::database::Database;
use crate::utils::error::{EngineError, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Reporting collaborator
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync + std::fmt::Debug {
    async fn publish(&self, report: &DailyReport) -> Result<()>;

    fn name(&self) -> &str;
}

/// Writes the report to the log
#[derive(Debug, Default)]
pub struct LogReportSink;

#[async_trait::async_trait]
impl ReportSink for LogReportSink {
    async fn publish(&self, report: &DailyReport) -> Result<()> {
        info!(
            period_start = %report.period_start,
            period_end = %report.period_end,
            total_alerts = report.total_alerts,
            escalations = report.escalations,
            open_critical = report.open_critical,
            by_severity = ?report.by_severity,
            by_status = ?report.by_status,
            notifications = ?report.notifications,
            "Daily alert report"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// POSTs the report as JSON
#[derive(Debug)]
pub struct WebhookReportSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookReportSink {
    pub fn new(url: String, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EngineError::HttpClient)?;
        Ok(Self { url, client })
    }
}

#[async_trait::async_trait]
impl ReportSink for WebhookReportSink {
    async fn publish(&self, report: &DailyReport) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(report)
            .send()
            .await
            .map_err(|e| EngineError::report(format!("Report webhook unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(EngineError::report(format!(
                "Report webhook returned status: {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// Build the configured sink
pub fn report_sink(config: &ReportConfig) -> Result<Arc<dyn ReportSink>> {
    match config.mode {
        ReportMode::Log => Ok(Arc::new(LogReportSink)),
        ReportMode::Webhook => {
            let url = config
                .url
                .clone()
                .ok_or_else(|| EngineError::config("Webhook report mode needs a url"))?;
            Ok(Arc::new(WebhookReportSink::new(
                url,
                std::time::Duration::from_secs(config.timeout_seconds),
            )?))
        }
    }
}

#[derive(Debug, Clone)]
pub struct DailyReportJob {
    store: Arc<Database>,
    sink: Arc<dyn ReportSink>,
}

impl DailyReportJob {
    pub fn new(store: Arc<Database>, sink: Arc<dyn ReportSink>) -> Self {
        Self { store, sink }
    }

    /// Summary of the 24 hours ending at `now`
    pub async fn build(&self, now: DateTime<Utc>) -> Result<DailyReport> {
        self.store
            .daily_report(now - Duration::hours(24), now, now)
            .await
    }

    /// Build and hand off. A failure is returned, not retried here.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<DailyReport> {
        let report = self.build(now).await?;
        self.sink.publish(&report).await?;
        info!(
            sink = self.sink.name(),
            total_alerts = report.total_alerts,
            "Daily report published"
        );
        Ok(report)
    }
}
