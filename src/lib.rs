//! # predictive-alerts
//!
//! Alert engine for predictive maintenance. It consumes failure predictions,
//! raises deduplicated alerts, tracks their lifecycle, dispatches
//! notifications with retry, and escalates CRITICAL alerts nobody has
//! acknowledged.
//!
//! ## Components
//!
//! - **Event consumer**: filters `prediction_completed` events and admits
//!   alerts through the deduplicator
//! - **Notification dispatcher**: at-least-once delivery over email and SMS
//!   channels with exponential backoff
//! - **Lifecycle API**: acknowledge and resolve under optimistic concurrency
//! - **Scheduler**: SLA escalation, daily report, retention cleanup
//! - **Maintenance**: task scheduling, manual or on escalation
//!
//! ## Running the engine
//!
//! ```rust,no_run
//! use predictive_alerts::{AlertEngine, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/engine.yaml").await?;
//!     AlertEngine::new(config).run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{EngineError, Result};

use crate::core::ingest::{ChannelEventSource, Deduplicator, EventConsumer, EventSource};
use crate::core::maintenance::MaintenanceScheduler;
use crate::core::notifications::{ChannelSet, NotificationDispatcher};
use crate::core::scheduler::{Scheduler, report_sink};
use crate::monitoring::WorkerRegistry;
use crate::server::ServerBuilder;
use crate::storage::StorageLayer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// How long workers get to finish their current pass on shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// The assembled engine: store, workers and HTTP surface
pub struct AlertEngine {
    config: Config,
}

impl AlertEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connect and bring the schema up to date, then return
    pub async fn migrate(&self) -> Result<()> {
        let storage = StorageLayer::new(self.config.storage()).await?;
        storage.migrate().await?;
        storage.close().await
    }

    /// Run until the HTTP server stops or the process receives Ctrl-C
    pub async fn run(self) -> Result<()> {
        let engine = &self.config.engine;
        info!("Starting alert engine v{}", VERSION);

        let storage = StorageLayer::new(&engine.storage).await?;
        storage.migrate().await?;
        let store = storage.database.clone();

        let registry = WorkerRegistry::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers = Vec::new();

        let (source, publisher) = ChannelEventSource::new(engine.alerting.event_buffer);
        let consumer = EventConsumer::new(
            Deduplicator::new(store.clone(), engine.alerting.dedup_window()),
            engine.alerting.clone(),
        );
        let source: Arc<dyn EventSource> = Arc::new(source);
        workers.push(tokio::spawn(consumer.run(
            source,
            shutdown_rx.clone(),
            registry.register("event-consumer"),
        )));

        let dispatcher = NotificationDispatcher::new(
            store.clone(),
            ChannelSet::from_config(&engine.notifications)?,
            &engine.notifications,
        );
        workers.push(tokio::spawn(dispatcher.run(
            shutdown_rx.clone(),
            registry.register("dispatcher"),
        )));

        let sink = report_sink(&engine.scheduler.report)?;
        let scheduler = Scheduler::from_config(
            store.clone(),
            &engine.scheduler,
            MaintenanceScheduler::new(store.clone(), engine.maintenance.clone()),
            sink.clone(),
        )?;
        workers.extend(scheduler.spawn(shutdown_rx, &registry));

        let (server, handle) =
            ServerBuilder::new(self.config.clone(), storage.clone(), registry, publisher)
                .with_report_sink(sink)
                .build()?
                .start()?;

        let mut server = tokio::spawn(server);
        let served = tokio::select! {
            result = &mut server => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                handle.stop(true).await;
                server.await
            }
        };
        let served = match served {
            Ok(result) => result.map_err(EngineError::Io),
            Err(e) => Err(EngineError::internal(format!("HTTP server task failed: {}", e))),
        };

        let _ = shutdown_tx.send(true);
        let joined = tokio::time::timeout(SHUTDOWN_GRACE, futures::future::join_all(workers)).await;
        if joined.is_err() {
            warn!("Workers did not stop within {:?}", SHUTDOWN_GRACE);
        }

        storage.close().await?;
        info!("Alert engine stopped");
        served
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
