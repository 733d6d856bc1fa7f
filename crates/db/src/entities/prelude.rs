//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::advances::Entity as Advances;
pub use super::drivers::Entity as Drivers;
pub use super::leaf_collections::Entity as LeafCollections;
pub use super::loans::Entity as Loans;
pub use super::payments::Entity as Payments;
pub use super::product_orders::Entity as ProductOrders;
pub use super::products::Entity as Products;
pub use super::suppliers::Entity as Suppliers;
