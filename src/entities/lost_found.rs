use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum YesNo {
    #[sea_orm(string_value = "Yes")]
    Yes,
    #[sea_orm(string_value = "No")]
    No,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_found")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub item_id: i32,
    pub service_id: i32,
    pub reporter_name: String,
    pub item_name: String,
    pub found: YesNo,
    pub lost: YesNo,
    pub location_reported: String,
    pub date_reported: Date,
    pub reporter_contact: String,
    pub item_details: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::ServiceId",
        on_delete = "Cascade"
    )]
    Service,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
