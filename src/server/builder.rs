//! Server builder
//!
//! Assembles the [`AppState`] from configuration and the shared store so the
//! engine and the tests wire handlers the same way.

use crate::config::Config;
use crate::core::inference::{HttpInferenceClient, InferenceClient};
use crate::core::ingest::{Deduplicator, EventConsumer, EventPublisher};
use crate::core::lifecycle::AlertLifecycle;
use crate::core::maintenance::MaintenanceScheduler;
use crate::core::scheduler::{DailyReportJob, ReportSink, report_sink};
use crate::monitoring::{HealthChecker, WorkerRegistry};
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use std::sync::Arc;

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Config,
    storage: StorageLayer,
    workers: WorkerRegistry,
    publisher: EventPublisher,
    report_sink: Option<Arc<dyn ReportSink>>,
    inference: Option<Arc<dyn InferenceClient>>,
}

impl ServerBuilder {
    pub fn new(
        config: Config,
        storage: StorageLayer,
        workers: WorkerRegistry,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            config,
            storage,
            workers,
            publisher,
            report_sink: None,
            inference: None,
        }
    }

    /// Override the sink built from `scheduler.report`
    pub fn with_report_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    /// Override the client built from `inference.url`
    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn build_state(&self) -> Result<AppState> {
        let store = self.storage.database.clone();
        let engine = &self.config.engine;

        let sink = match &self.report_sink {
            Some(sink) => sink.clone(),
            None => report_sink(&engine.scheduler.report)?,
        };
        let inference = match &self.inference {
            Some(client) => Some(client.clone()),
            None => HttpInferenceClient::from_config(&engine.inference)?
                .map(|client| Arc::new(client) as Arc<dyn InferenceClient>),
        };

        Ok(AppState {
            config: Arc::new(self.config.clone()),
            store: store.clone(),
            lifecycle: AlertLifecycle::new(store.clone()),
            maintenance: MaintenanceScheduler::new(store.clone(), engine.maintenance.clone()),
            consumer: EventConsumer::new(
                Deduplicator::new(store.clone(), engine.alerting.dedup_window()),
                engine.alerting.clone(),
            ),
            publisher: self.publisher.clone(),
            reports: DailyReportJob::new(store, sink),
            health: HealthChecker::new(self.storage.clone(), self.workers.clone()),
            inference,
        })
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let state = self.build_state()?;
        Ok(HttpServer::new(self.config.engine.server.clone(), state))
    }
}
