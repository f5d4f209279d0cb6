use sea_orm_migration::{prelude::*, schema::*};

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
                    .col(string_len(User::UserId, 8).primary_key())
                    .col(string_len(User::Name, 100).not_null())
                    .col(string_len(User::Phone, 11).not_null().unique_key())
                    .col(date(User::DateOfBirth).not_null())
                    .col(string_len(User::Email, 254).not_null().unique_key())
                    .col(string_len(User::Gender, 10).not_null())
                    .col(string_len(User::Street, 100).not_null())
                    .col(string_len(User::Area, 50).not_null())
                    .col(string_len(User::City, 50).not_null())
                    .col(boolean(User::IsAdmin).not_null().default(false))
                    // Verified | Pending
                    .col(string_len(User::VerificationStatus, 20).not_null())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    UserId,
    Name,
    Phone,
    DateOfBirth,
    Email,
    Gender,
    Street,
    Area,
    City,
    IsAdmin,
    VerificationStatus,
    PasswordHash,
    CreatedAt,
}
