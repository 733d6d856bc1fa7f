//! `SeaORM` Entity for suppliers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Register code assigned by the factory office.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_no: Option<String>,
    pub bank_branch: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leaf_collections::Entity")]
    LeafCollections,
    #[sea_orm(has_many = "super::loans::Entity")]
    Loans,
    #[sea_orm(has_many = "super::advances::Entity")]
    Advances,
    #[sea_orm(has_many = "super::product_orders::Entity")]
    ProductOrders,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::leaf_collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeafCollections.def()
    }
}

impl Related<super::loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::advances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advances.def()
    }
}

impl Related<super::product_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductOrders.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
