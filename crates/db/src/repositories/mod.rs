//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod advance;
pub mod collection;
pub mod driver;
pub mod loan;
pub mod order;
pub mod product;
pub mod settlement;
pub mod supplier;

pub use account::{AccountError, AccountRepository, RegisterDriverInput, RegisterSupplierInput};
pub use advance::{AdvanceError, AdvanceRepository};
pub use collection::{
    CollectionRepository, LeafCollectionError, RecordCollectionInput, UpdateCollectionInput,
};
pub use driver::{DriverError, DriverRepository};
pub use loan::{CreateLoanInput, LoanError, LoanRepository};
pub use order::{OrderRepository, PlaceOrderInput, ProductOrderError};
pub use product::{CreateProductInput, ProductError, ProductRepository, UpdateProductInput};
pub use settlement::{CreatePaymentInput, PaymentError, SettlementRepository};
pub use supplier::{SupplierError, SupplierRepository, UpdateSupplierInput};

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use crate::entities::suppliers;

/// Returns true when a supplier with this register code exists.
pub(crate) async fn supplier_exists<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, DbErr> {
    Ok(suppliers::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .is_some())
}
