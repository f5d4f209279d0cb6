use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "Verified")]
    Verified,
    #[sea_orm(string_value = "Pending")]
    Pending,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub date_of_birth: Date,
    #[sea_orm(unique)]
    pub email: String,
    pub gender: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub is_admin: bool,
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::takes::Entity")]
    Takes,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
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

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
