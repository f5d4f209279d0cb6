use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum ServiceType {
    #[sea_orm(string_value = "Bus")]
    Bus,
    #[sea_orm(string_value = "Carpool")]
    Carpool,
    #[sea_orm(string_value = "Public Transport")]
    #[serde(rename = "Public Transport")]
    PublicTransport,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub route_name: String,
    pub start_location: String,
    pub end_location: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost: Decimal,
    pub pickup: String,
    pub dropoff: String,
    pub bus_id: Option<i32>,
    pub carpool_id: Option<i32>,
    pub vehicle_type: String,
    pub all_possible_pickup_location: String,
    pub frequency: String,
    pub stoppage: String,
    pub available_time: String,
    pub service_type: ServiceType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::driver::Entity")]
    Drivers,
    #[sea_orm(has_many = "super::takes::Entity")]
    Takes,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::lost_found::Entity")]
    LostFound,
    #[sea_orm(has_many = "super::incident::Entity")]
    Incidents,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drivers.def()
    }
}

impl Related<super::takes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Takes.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::lost_found::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LostFound.def()
    }
}

impl Related<super::incident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incidents.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
