use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub booking_id: i32,
    pub user_id: String,
    pub service_id: i32,
    pub route_id: i32,
    pub seat_no: String,
    pub name: String,
    pub date: Date,
    pub time: Time,
    pub seat_availability: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::ServiceId",
        on_delete = "Cascade"
    )]
    Service,
    #[sea_orm(has_many = "super::otp::Entity")]
    Otps,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::otp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Otps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
