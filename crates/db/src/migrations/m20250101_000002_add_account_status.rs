//! Migration to add account status lifecycle columns to user.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 0 = inactive, 1 = active, 2 = banned, 3 = deleted, 4 = suspended
        manager
            .alter_table(
                Table::alter()
                    .table(User::Table)
                    .add_column(
                        ColumnDef::new(User::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .add_column(ColumnDef::new(User::DeletedAt).timestamp_with_time_zone().null())
                    .add_column(ColumnDef::new(User::BannedAt).timestamp_with_time_zone().null())
                    .add_column(
                        ColumnDef::new(User::SuspendedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (for per-status listing and counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_status")
                    .table(User::Table)
                    .col(User::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_status")
                    .table(User::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(User::Table)
                    .drop_column(User::Status)
                    .drop_column(User::DeletedAt)
                    .drop_column(User::BannedAt)
                    .drop_column(User::SuspendedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum User {
    Table,
    Status,
    DeletedAt,
    BannedAt,
    SuspendedAt,
}
