use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::EquipmentId).string_len(100).not_null())
                    .col(ColumnDef::new(Alerts::Severity).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::FailureProbability).double().not_null())
                    .col(ColumnDef::new(Alerts::HealthScore).double().not_null())
                    .col(ColumnDef::new(Alerts::DaysUntilFailure).integer().not_null())
                    .col(ColumnDef::new(Alerts::Confidence).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Alerts::RecommendedAction).text().not_null())
                    .col(ColumnDef::new(Alerts::Source).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Alerts::SourcePredictionId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alerts::OpenKey).string_len(128).null())
                    .col(
                        ColumnDef::new(Alerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alerts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alerts::AcknowledgedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Alerts::AcknowledgedBy).string_len(100).null())
                    .col(ColumnDef::new(Alerts::AcknowledgementNotes).text().null())
                    .col(
                        ColumnDef::new(Alerts::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Alerts::ResolvedBy).string_len(100).null())
                    .col(ColumnDef::new(Alerts::ResolutionNotes).text().null())
                    .col(
                        ColumnDef::new(Alerts::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // Idempotent ingestion
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_source_prediction_id")
                    .table(Alerts::Table)
                    .col(Alerts::SourcePredictionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One open alert per equipment and severity; NULLs do not collide
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_open_key")
                    .table(Alerts::Table)
                    .col(Alerts::OpenKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_equipment_created")
                    .table(Alerts::Table)
                    .col(Alerts::EquipmentId)
                    .col(Alerts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_status_severity_created")
                    .table(Alerts::Table)
                    .col(Alerts::Status)
                    .col(Alerts::Severity)
                    .col(Alerts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_alerts_status_resolved")
                    .table(Alerts::Table)
                    .col(Alerts::Status)
                    .col(Alerts::ResolvedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
    EquipmentId,
    Severity,
    FailureProbability,
    HealthScore,
    DaysUntilFailure,
    Confidence,
    Status,
    RecommendedAction,
    Source,
    SourcePredictionId,
    OpenKey,
    CreatedAt,
    UpdatedAt,
    AcknowledgedAt,
    AcknowledgedBy,
    AcknowledgementNotes,
    ResolvedAt,
    ResolvedBy,
    ResolutionNotes,
    Version,
}
