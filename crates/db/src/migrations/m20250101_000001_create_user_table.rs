//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Email).string_len(320).not_null())
                    .col(ColumnDef::new(User::EmailLower).string_len(320).not_null())
                    .col(ColumnDef::new(User::UserName).string_len(256))
                    .col(
                        ColumnDef::new(User::EncryptedPassword)
                            .string_len(256)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(User::ResetPasswordToken).string_len(128))
                    .col(ColumnDef::new(User::ResetPasswordSentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::RememberCreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::SignInCount).integer().not_null().default(0))
                    .col(ColumnDef::new(User::CurrentSignInAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::LastSignInAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::CurrentSignInIp).string_len(64))
                    .col(ColumnDef::new(User::LastSignInIp).string_len(64))
                    .col(ColumnDef::new(User::ConfirmationToken).string_len(128))
                    .col(ColumnDef::new(User::ConfirmedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::ConfirmationSentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::UnconfirmedEmail).string_len(320))
                    .col(ColumnDef::new(User::FailedAttempts).integer().not_null().default(0))
                    .col(ColumnDef::new(User::UnlockToken).string_len(128))
                    .col(ColumnDef::new(User::LockedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email_lower (case-insensitive uniqueness)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email_lower")
                    .table(User::Table)
                    .col(User::EmailLower)
                    .unique()
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_user_reset_password_token", User::ResetPasswordToken),
            ("idx_user_confirmation_token", User::ConfirmationToken),
            ("idx_user_unlock_token", User::UnlockToken),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(User::Table)
                        .col(column)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    EmailLower,
    UserName,
    EncryptedPassword,
    ResetPasswordToken,
    ResetPasswordSentAt,
    RememberCreatedAt,
    SignInCount,
    CurrentSignInAt,
    LastSignInAt,
    CurrentSignInIp,
    LastSignInIp,
    ConfirmationToken,
    ConfirmedAt,
    ConfirmationSentAt,
    UnconfirmedEmail,
    FailedAttempts,
    UnlockToken,
    LockedAt,
    CreatedAt,
    UpdatedAt,
}
