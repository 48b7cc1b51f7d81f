use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertEscalations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlertEscalations::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlertEscalations::AlertId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertEscalations::Tier)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertEscalations::TierMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertEscalations::NotificationJobId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertEscalations::EscalatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_escalations_alert_id")
                            .from(AlertEscalations::Table, AlertEscalations::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Each tier escalates once per alert
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alert_escalations_alert_tier")
                    .table(AlertEscalations::Table)
                    .col(AlertEscalations::AlertId)
                    .col(AlertEscalations::Tier)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertEscalations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlertEscalations {
    Table,
    Id,
    AlertId,
    Tier,
    TierMinutes,
    NotificationJobId,
    EscalatedAt,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
}
