use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(pk_auto(Service::ServiceId))
                    .col(string_len(Service::RouteName, 100).not_null())
                    .col(string_len(Service::StartLocation, 100).not_null())
                    .col(string_len(Service::EndLocation, 100).not_null())
                    .col(decimal_len(Service::Cost, 10, 2).not_null())
                    .col(string_len(Service::Pickup, 100).not_null())
                    .col(string_len(Service::Dropoff, 100).not_null())
                    .col(integer_null(Service::BusId))
                    .col(integer_null(Service::CarpoolId))
                    .col(string_len(Service::VehicleType, 50).not_null())
                    .col(string_len(Service::AllPossiblePickupLocation, 255).not_null())
                    .col(string_len(Service::Frequency, 50).not_null())
                    .col(string_len(Service::Stoppage, 255).not_null())
                    .col(string_len(Service::AvailableTime, 50).not_null())
                    // Bus | Carpool | Public Transport
                    .col(string_len(Service::ServiceType, 50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Driver::Table)
                    .if_not_exists()
                    .col(string_len(Driver::LicenseNo, 20).primary_key())
                    .col(integer(Driver::ServiceId).not_null())
                    .col(string_len(Driver::Name, 100).not_null())
                    .col(string_len(Driver::Phone, 11).not_null())
                    .col(string_len(Driver::Schedule, 100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_service")
                            .from(Driver::Table, Driver::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Driver::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Service {
    Table,
    ServiceId,
    RouteName,
    StartLocation,
    EndLocation,
    Cost,
    Pickup,
    Dropoff,
    BusId,
    CarpoolId,
    VehicleType,
    AllPossiblePickupLocation,
    Frequency,
    Stoppage,
    AvailableTime,
    ServiceType,
}

#[derive(DeriveIden)]
pub enum Driver {
    Table,
    LicenseNo,
    ServiceId,
    Name,
    Phone,
    Schedule,
}
