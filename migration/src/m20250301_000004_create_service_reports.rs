use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000002_create_services::Service;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LostFound::Table)
                    .if_not_exists()
                    .col(pk_auto(LostFound::ItemId))
                    .col(integer(LostFound::ServiceId).not_null())
                    .col(string_len(LostFound::ReporterName, 100).not_null())
                    .col(string_len(LostFound::ItemName, 100).not_null())
                    .col(string_len(LostFound::Found, 3).not_null())
                    .col(string_len(LostFound::Lost, 3).not_null())
                    .col(string_len(LostFound::LocationReported, 100).not_null())
                    .col(date(LostFound::DateReported).not_null())
                    .col(string_len(LostFound::ReporterContact, 11).not_null())
                    .col(string_len(LostFound::ItemDetails, 255).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_found_service")
                            .from(LostFound::Table, LostFound::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Incident::Table)
                    .if_not_exists()
                    .col(pk_auto(Incident::IncidentId))
                    .col(integer(Incident::ServiceId).not_null())
                    .col(string_len(Incident::Location, 100).not_null())
                    .col(string_len(Incident::ReporterName, 100).not_null())
                    .col(string_len(Incident::ReporterContact, 11).not_null())
                    .col(string_len(Incident::IncidentType, 50).not_null())
                    .col(string_len(Incident::Status, 20).not_null())
                    .col(string_len(Incident::Description, 255).not_null())
                    .col(string_len(Incident::Title, 100).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incident_service")
                            .from(Incident::Table, Incident::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(pk_auto(Feedback::FeedbackId))
                    .col(integer(Feedback::ServiceId).not_null())
                    .col(
                        integer(Feedback::Ratings)
                            .not_null()
                            .check(Expr::col(Feedback::Ratings).between(1, 5)),
                    )
                    .col(string_len(Feedback::Comment, 255).not_null())
                    .col(string_len(Feedback::Status, 20).not_null())
                    .col(date(Feedback::Date).not_null())
                    .col(time(Feedback::Time).not_null())
                    .col(string_len(Feedback::Category, 50).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_service")
                            .from(Feedback::Table, Feedback::ServiceId)
                            .to(Service::Table, Service::ServiceId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Incident::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LostFound::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LostFound {
    Table,
    ItemId,
    ServiceId,
    ReporterName,
    ItemName,
    Found,
    Lost,
    LocationReported,
    DateReported,
    ReporterContact,
    ItemDetails,
}

#[derive(DeriveIden)]
pub enum Incident {
    Table,
    IncidentId,
    ServiceId,
    Location,
    ReporterName,
    ReporterContact,
    IncidentType,
    Status,
    Description,
    Title,
}

#[derive(DeriveIden)]
pub enum Feedback {
    Table,
    FeedbackId,
    ServiceId,
    Ratings,
    Comment,
    Status,
    Date,
    Time,
    Category,
}
