//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite store with migrations applied.

use predictive_alerts::config::DatabaseConfig;
use predictive_alerts::storage::database::Database;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    pub async fn new() -> Self {
        // In-memory DB only supports 1 connection
        let db = Database::new(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner
    }

    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }
}
