//! Product order repository.
//!
//! The Completed transition runs in one transaction: the order row is locked,
//! stock is taken with a conditional `UPDATE ... WHERE stock_bags >= quantity`,
//! and the product rate is snapshotted onto the order. Either all of it
//! commits or none of it does.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};
use tealeaf_core::order::{
    OrderCharge, OrderError, OrderLifecycle, OrderStatus, OrderTransition,
};
use tealeaf_shared::AppError;
use tracing::{info, warn};
use uuid::Uuid;

use super::supplier_exists;
use crate::entities::{product_orders, products};

/// Error types for product order operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductOrderError {
    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Ordering supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Ordered product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Lifecycle or stock rule violated.
    #[error(transparent)]
    Rejected(#[from] OrderError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductOrderError> for AppError {
    fn from(e: ProductOrderError) -> Self {
        let message = e.to_string();
        match e {
            ProductOrderError::NotFound(_)
            | ProductOrderError::SupplierNotFound(_)
            | ProductOrderError::ProductNotFound(_) => Self::NotFound(message),
            ProductOrderError::Rejected(_) => Self::Validation(message),
            ProductOrderError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    /// Ordering supplier.
    pub supplier_id: String,
    /// Ordered product.
    pub product_id: Uuid,
    /// Bags ordered.
    pub quantity: i32,
    /// `Pending` (default) or `Completed` for counter sales.
    pub status: OrderStatus,
}

/// Product order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: Arc<DatabaseConnection>,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Places an order. An order placed as `Completed` takes stock immediately.
    pub async fn place(
        &self,
        input: PlaceOrderInput,
    ) -> Result<product_orders::Model, ProductOrderError> {
        let transition = OrderLifecycle::initial(input.status, input.quantity)?;
        if !supplier_exists(self.db.as_ref(), &input.supplier_id).await? {
            return Err(ProductOrderError::SupplierNotFound(input.supplier_id));
        }

        let txn = self.db.begin().await?;
        let product = lock_product(&txn, input.product_id).await?;
        let now = Utc::now().into();

        let mut order = product_orders::ActiveModel {
            id: Set(Uuid::now_v7()),
            supplier_id: Set(input.supplier_id),
            product_id: Set(product.id),
            quantity: Set(input.quantity),
            status: Set(transition.new_status().into()),
            rate_at_completion: Set(None),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        if let OrderTransition::Complete { consume_bags } = transition {
            consume_stock(&txn, &product, consume_bags).await?;
            order.rate_at_completion = Set(Some(product.rate_per_bag));
            order.completed_at = Set(Some(now));
        }

        let order = order.insert(&txn).await?;
        txn.commit().await?;

        info!(
            order_id = %order.id,
            supplier_id = %order.supplier_id,
            product_id = %order.product_id,
            quantity = order.quantity,
            status = ?order.status,
            "Product order placed"
        );
        Ok(order)
    }

    /// Finds an order by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<product_orders::Model, ProductOrderError> {
        product_orders::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ProductOrderError::NotFound(id))
    }

    /// Lists a supplier's orders, newest first.
    pub async fn list_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<Vec<product_orders::Model>, DbErr> {
        product_orders::Entity::find()
            .filter(product_orders::Column::SupplierId.eq(supplier_id))
            .order_by_desc(product_orders::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Moves an order to a new status.
    ///
    /// Completing an order decrements stock exactly once and snapshots the
    /// product rate; a second completion is rejected by the lifecycle. When
    /// stock is short the whole transaction is rolled back and stock is left
    /// unchanged.
    pub async fn update_status(
        &self,
        id: Uuid,
        to: OrderStatus,
    ) -> Result<product_orders::Model, ProductOrderError> {
        let txn = self.db.begin().await?;

        let order = product_orders::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ProductOrderError::NotFound(id))?;

        let transition = OrderLifecycle::transition(order.status.into(), to, order.quantity)?;
        let now = Utc::now().into();
        let product_id = order.product_id;
        let mut active = order.into_active_model();
        active.status = Set(transition.new_status().into());
        active.updated_at = Set(now);

        if let OrderTransition::Complete { consume_bags } = transition {
            let product = lock_product(&txn, product_id).await?;
            consume_stock(&txn, &product, consume_bags).await?;
            active.rate_at_completion = Set(Some(product.rate_per_bag));
            active.completed_at = Set(Some(now));
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(order_id = %id, status = %to, "Product order status updated");
        Ok(updated)
    }

    /// Deletes an order that is still Pending or was Cancelled.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductOrderError> {
        let order = self.find_by_id(id).await?;
        OrderLifecycle::check_deletable(order.status.into())?;

        let result = product_orders::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(ProductOrderError::NotFound(id));
        }
        info!(order_id = %id, "Product order deleted");
        Ok(())
    }

    /// Every order of a supplier reduced to what the resolver needs.
    pub async fn charges_for_supplier(&self, supplier_id: &str) -> Result<Vec<OrderCharge>, DbErr> {
        let rows = product_orders::Entity::find()
            .filter(product_orders::Column::SupplierId.eq(supplier_id))
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderCharge {
                quantity: row.quantity,
                status: row.status.into(),
                rate_at_completion: row.rate_at_completion,
            })
            .collect())
    }
}

async fn lock_product(
    txn: &DatabaseTransaction,
    product_id: Uuid,
) -> Result<products::Model, ProductOrderError> {
    products::Entity::find_by_id(product_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(ProductOrderError::ProductNotFound(product_id))
}

/// Takes `bags` out of stock only if enough remain.
async fn consume_stock(
    txn: &DatabaseTransaction,
    product: &products::Model,
    bags: i32,
) -> Result<(), ProductOrderError> {
    if let Err(e) = OrderLifecycle::check_stock(bags, product.stock_bags) {
        warn!(
            product_id = %product.id,
            requested = bags,
            available = product.stock_bags,
            "Insufficient stock"
        );
        return Err(e.into());
    }

    let result = products::Entity::update_many()
        .col_expr(
            products::Column::StockBags,
            Expr::col(products::Column::StockBags).sub(bags),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(product.id))
        .filter(products::Column::StockBags.gte(bags))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        warn!(product_id = %product.id, requested = bags, "Stock changed before decrement");
        return Err(OrderError::InsufficientStock {
            requested: bags,
            available: product.stock_bags,
        }
        .into());
    }
    Ok(())
}
