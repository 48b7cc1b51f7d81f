use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceTasks::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::EquipmentId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceTasks::AlertId).string_len(36).null())
                    .col(
                        ColumnDef::new(MaintenanceTasks::TaskType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::Priority)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceTasks::Description).text().null())
                    .col(
                        ColumnDef::new(MaintenanceTasks::ScheduledDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::EstimatedDurationHours)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::Source)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_tasks_alert_id")
                            .from(MaintenanceTasks::Table, MaintenanceTasks::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_maintenance_tasks_equipment_scheduled")
                    .table(MaintenanceTasks::Table)
                    .col(MaintenanceTasks::EquipmentId)
                    .col(MaintenanceTasks::ScheduledDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_maintenance_tasks_alert_id")
                    .table(MaintenanceTasks::Table)
                    .col(MaintenanceTasks::AlertId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MaintenanceTasks {
    Table,
    Id,
    EquipmentId,
    AlertId,
    TaskType,
    Priority,
    Status,
    Title,
    Description,
    ScheduledDate,
    EstimatedDurationHours,
    Source,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
}
