use crate::config::DatabaseConfig;
use crate::utils::error::{EngineError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::migration::Migrator;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Connect to the configured database
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend = if config.is_sqlite() {
            Self::ensure_sqlite_dir(&config.url)?;
            "sqlite"
        } else {
            "postgres"
        };

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        // An in-memory database lives and dies with its only connection
        if !config.url.contains(":memory:") {
            opt.idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        let db = Database::connect(opt)
            .await
            .map_err(|e| EngineError::store_unavailable(format!("Failed to connect: {}", e)))?;

        info!(backend, "Database connection established");
        Ok(Self { db })
    }

    /// Create the parent directory of a file-backed SQLite database
    fn ensure_sqlite_dir(url: &str) -> Result<()> {
        let path = url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:")
            .split('?')
            .next()
            .unwrap_or_default();

        if path.is_empty() || path.contains(":memory:") {
            return Ok(());
        }

        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EngineError::Config(format!("Failed to create data directory: {}", e))
                })?;
            }
        }
        Ok(())
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            EngineError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(EngineError::Database)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");
        self.db
            .ping()
            .await
            .map_err(|e| EngineError::store_unavailable(e.to_string()))?;
        Ok(())
    }
}
