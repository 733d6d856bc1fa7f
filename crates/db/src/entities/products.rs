//! `SeaORM` Entity for products table.

use super::sea_orm_active_enums::ProductKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub kind: ProductKind,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub rate_per_bag: Decimal,
    /// Never negative; enforced by a CHECK constraint.
    pub stock_bags: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_orders::Entity")]
    ProductOrders,
}

impl Related<super::product_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
