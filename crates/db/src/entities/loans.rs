//! `SeaORM` Entity for loans table.

use super::sea_orm_active_enums::LoanStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier_id: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub principal_amount: Decimal,
    pub duration_months: i32,
    pub purpose: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub monthly_installment: Decimal,
    pub issued_on: Date,
    pub due_date: Date,
    pub status: LoanStatus,
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
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
