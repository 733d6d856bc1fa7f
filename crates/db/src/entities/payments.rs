//! `SeaORM` Entity for payments table.
//!
//! A payment is a persisted settlement snapshot. Amounts are written once;
//! only `status` and `archived_at` change afterwards.

use super::sea_orm_active_enums::SettlementStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supplier_id: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub gross_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub loan_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub advance_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub products_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub transport_charge: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub final_total: Decimal,
    pub payment_date: Date,
    pub status: SettlementStatus,
    pub idempotency_key: Option<String>,
    pub archived_at: Option<DateTimeWithTimeZone>,
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
