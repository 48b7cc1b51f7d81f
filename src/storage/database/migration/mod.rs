use sea_orm_migration::prelude::*;

mod m20250301_000001_create_alerts_table;
mod m20250301_000002_create_notification_jobs_table;
mod m20250301_000003_create_alert_escalations_table;
mod m20250301_000004_create_maintenance_tasks_table;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_alerts_table::Migration),
            Box::new(m20250301_000002_create_notification_jobs_table::Migration),
            Box::new(m20250301_000003_create_alert_escalations_table::Migration),
            Box::new(m20250301_000004_create_maintenance_tasks_table::Migration),
        ]
    }
}
