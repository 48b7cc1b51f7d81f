//! Storage layer for the alert engine
//!
//! Alerts, notification jobs, escalations and maintenance tasks all live in
//! one relational store so that each admission or escalation commits
//! atomically.

/// Database storage module
pub mod database;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main storage layer shared by the workers and the HTTP surface
#[derive(Debug, Clone)]
pub struct StorageLayer {
    pub database: Arc<database::Database>,
}

impl StorageLayer {
    /// Connect to the configured store
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");
        debug!("Connecting to database");
        let database = Arc::new(database::Database::new(&config.database).await?);
        info!("Storage layer initialized successfully");
        Ok(Self { database })
    }

    /// Wrap a store that is already connected, such as a migrated test database
    pub fn from_database(database: Arc<database::Database>) -> Self {
        Self { database }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        self.database.migrate().await
    }

    pub async fn health_check(&self) -> StorageHealthStatus {
        let database = match self.database.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        };
        StorageHealthStatus {
            database,
            overall: database,
        }
    }

    /// Close the pool if this is the last handle to it
    pub async fn close(self) -> Result<()> {
        info!("Closing storage connections");
        match Arc::try_unwrap(self.database) {
            Ok(db) => db.close().await,
            Err(_) => {
                debug!("Database still shared, leaving pool to drop");
                Ok(())
            }
        }
    }

    pub fn db(&self) -> &database::Database {
        &self.database
    }
}

/// Storage health status
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageHealthStatus {
    pub database: bool,
    pub overall: bool,
}
