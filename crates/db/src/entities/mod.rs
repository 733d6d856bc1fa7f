//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod advances;
pub mod drivers;
pub mod leaf_collections;
pub mod loans;
pub mod payments;
pub mod product_orders;
pub mod products;
pub mod sea_orm_active_enums;
pub mod suppliers;
