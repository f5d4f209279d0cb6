use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_users::User;
use super::m20250301_000002_create_services::Service;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Takes::Table)
                    .if_not_exists()
                    .col(string_len(Takes::UserId, 8).not_null())
                    .col(integer(Takes::ServiceId).not_null())
                    .col(date(Takes::DateTaken).not_null())
                    .col(time(Takes::TimeTaken).not_null())
                    .primary_key(Index::create().col(Takes::UserId).col(Takes::ServiceId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_takes_user")
                            .from(Takes::Table, Takes::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_takes_service")
                            .from(Takes::Table, Takes::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::BookingId))
                    .col(string_len(Booking::UserId, 8).not_null())
                    .col(integer(Booking::ServiceId).not_null())
                    .col(integer(Booking::RouteId).not_null())
                    .col(string_len(Booking::SeatNo, 10).not_null())
                    .col(string_len(Booking::Name, 100).not_null())
                    .col(date(Booking::Date).not_null())
                    .col(time(Booking::Time).not_null())
                    .col(string_len(Booking::SeatAvailability, 20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Takes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Takes {
    Table,
    UserId,
    ServiceId,
    DateTaken,
    TimeTaken,
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    BookingId,
    UserId,
    ServiceId,
    RouteId,
    SeatNo,
    Name,
    Date,
    Time,
    SeatAvailability,
}
