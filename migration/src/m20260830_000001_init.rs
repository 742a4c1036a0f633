use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== USERS ==========
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== RELAY STATUS ==========
        // Single sentinel row (id = 1); row present means the relay is on.
        manager
            .create_table(
                Table::create()
                    .table(RelayStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RelayStatus::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== DEVICE LOGS ==========
        // Append-only audit trail of relay transitions.
        manager
            .create_table(
                Table::create()
                    .table(DeviceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeviceLogs::Action).string_len(16).not_null())
                    .col(
                        ColumnDef::new(DeviceLogs::UserEmail)
                            .string_len(254)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeviceLogs::EnrollId).string_len(64).not_null())
                    .col(
                        ColumnDef::new(DeviceLogs::LoggedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-user log queries, newest first
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX idx_device_logs_user_time ON device_logs (user_email, logged_at DESC)",
            )
            .await?;

        // ========== DATA RECORDS ==========
        manager
            .create_table(
                Table::create()
                    .table(DataRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataRecords::Value).text().not_null())
                    .col(
                        ColumnDef::new(DataRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(DataRecords::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(DeviceLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(RelayStatus::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum RelayStatus {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub enum DeviceLogs {
    Table,
    Id,
    Action,
    UserEmail,
    EnrollId,
    LoggedAt,
}

#[derive(DeriveIden)]
pub enum DataRecords {
    Table,
    Id,
    Value,
    CreatedAt,
}
