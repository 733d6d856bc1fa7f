//! `SeaORM` Entity for leaf_collections table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leaf_collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier_id: String,
    pub driver_id: Option<String>,
    /// Rate per kg in force when the leaf was weighed.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub rate_at_collection: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub gross_weight_kg: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub water_weight_kg: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub bag_weight_kg: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 3)))")]
    pub net_weight_kg: Decimal,
    pub collected_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id"
    )]
    Suppliers,
    #[sea_orm(
        belongs_to = "super::drivers::Entity",
        from = "Column::DriverId",
        to = "super::drivers::Column::Id"
    )]
    Drivers,
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::drivers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drivers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
