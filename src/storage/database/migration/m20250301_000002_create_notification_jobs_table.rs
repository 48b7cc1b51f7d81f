use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationJobs::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::AlertId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::Channel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::DispatchKey)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::Escalation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::Attempt)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::NextAttemptAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(NotificationJobs::LastError).text().null())
                    .col(
                        ColumnDef::new(NotificationJobs::DeliveredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationJobs::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_jobs_alert_id")
                            .from(NotificationJobs::Table, NotificationJobs::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Dispatch idempotency
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notification_jobs_dispatch")
                    .table(NotificationJobs::Table)
                    .col(NotificationJobs::AlertId)
                    .col(NotificationJobs::Channel)
                    .col(NotificationJobs::DispatchKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notification_jobs_due")
                    .table(NotificationJobs::Table)
                    .col(NotificationJobs::Status)
                    .col(NotificationJobs::NextAttemptAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NotificationJobs {
    Table,
    Id,
    AlertId,
    Channel,
    DispatchKey,
    Escalation,
    Attempt,
    Status,
    NextAttemptAt,
    LastError,
    DeliveredAt,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
}
