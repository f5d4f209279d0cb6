use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000003_create_takes_and_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Otp::Table)
                    .if_not_exists()
                    .col(pk_auto(Otp::OtpId))
                    .col(integer(Otp::BookingId).not_null())
                    .col(string_len(Otp::Code, 6).not_null())
                    .col(string_len(Otp::Status, 20).not_null())
                    .col(date(Otp::Date).not_null())
                    .col(time(Otp::Time).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_otp_booking")
                            .from(Otp::Table, Otp::BookingId)
                            .to(Booking::Table, Booking::BookingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(pk_auto(Notification::NotificationId))
                    .col(timestamp_with_time_zone(Notification::SendTime).not_null())
                    .col(timestamp_with_time_zone(Notification::ReceiveTime).not_null())
                    .col(string_len(Notification::Message, 255).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Otp::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Otp {
    Table,
    OtpId,
    BookingId,
    Code,
    Status,
    Date,
    Time,
}

#[derive(DeriveIden)]
pub enum Notification {
    Table,
    NotificationId,
    SendTime,
    ReceiveTime,
    Message,
}
