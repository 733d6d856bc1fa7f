//! Fixtures shared by the repository tests.
//!
//! Every test drives a repository against `sea_orm::MockDatabase`, so each
//! expected statement needs its result appended in the order it runs.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use tealeaf_db::entities::{
    advances, leaf_collections, loans, payments, product_orders, products,
    sea_orm_active_enums::{AdvanceStatus, LoanStatus, OrderStatus, ProductKind, SettlementStatus},
    suppliers,
};
use uuid::Uuid;

pub const SUPPLIER: &str = "SUP-001";

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn supplier() -> suppliers::Model {
    suppliers::Model {
        id: SUPPLIER.to_string(),
        name: "Nimal Perera".to_string(),
        phone: Some("0771234567".to_string()),
        address: None,
        bank_name: None,
        bank_account_no: None,
        bank_branch: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn collection(net: Decimal, rate: Decimal) -> leaf_collections::Model {
    leaf_collections::Model {
        id: Uuid::now_v7(),
        supplier_id: SUPPLIER.to_string(),
        driver_id: None,
        rate_at_collection: rate,
        gross_weight_kg: net,
        water_weight_kg: Decimal::ZERO,
        bag_weight_kg: Decimal::ZERO,
        net_weight_kg: net,
        collected_at: now(),
        created_at: now(),
        updated_at: now(),
    }
}

pub fn loan(principal: Decimal, status: LoanStatus) -> loans::Model {
    loans::Model {
        id: Uuid::now_v7(),
        supplier_id: SUPPLIER.to_string(),
        principal_amount: principal,
        duration_months: 0,
        purpose: "Fertilizer".to_string(),
        monthly_installment: principal,
        issued_on: today(),
        due_date: today(),
        status,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn advance(amount: Decimal, status: AdvanceStatus) -> advances::Model {
    advances::Model {
        id: Uuid::now_v7(),
        supplier_id: SUPPLIER.to_string(),
        amount,
        advance_date: today(),
        status,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn product(rate: Decimal, stock: i32) -> products::Model {
    products::Model {
        id: Uuid::now_v7(),
        name: "Dolomite 50kg".to_string(),
        kind: ProductKind::Fertilizer,
        rate_per_bag: rate,
        stock_bags: stock,
        created_at: now(),
        updated_at: now(),
    }
}

pub fn order(
    product_id: Uuid,
    quantity: i32,
    status: OrderStatus,
    rate_at_completion: Option<Decimal>,
) -> product_orders::Model {
    product_orders::Model {
        id: Uuid::now_v7(),
        supplier_id: SUPPLIER.to_string(),
        product_id,
        quantity,
        status,
        rate_at_completion,
        completed_at: rate_at_completion.map(|_| now()),
        created_at: now(),
        updated_at: now(),
    }
}

pub fn payment(status: SettlementStatus) -> payments::Model {
    payments::Model {
        id: Uuid::now_v7(),
        supplier_id: SUPPLIER.to_string(),
        gross_income: Decimal::ONE_THOUSAND,
        loan_amount: Decimal::ZERO,
        advance_amount: Decimal::ZERO,
        products_amount: Decimal::ZERO,
        transport_charge: Decimal::ONE_HUNDRED,
        final_total: Decimal::from(900),
        payment_date: today(),
        status,
        idempotency_key: None,
        archived_at: None,
        created_at: now(),
        updated_at: now(),
    }
}
