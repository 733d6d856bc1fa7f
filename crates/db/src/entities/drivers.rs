//! `SeaORM` Entity for drivers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    /// Register code assigned by the factory office.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub vehicle_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leaf_collections::Entity")]
    LeafCollections,
}

impl Related<super::leaf_collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeafCollections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
