//! Product catalogue repository.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, sea_query::Expr,
};
use tealeaf_core::order::{OrderError, OrderLifecycle, ProductKind};
use tealeaf_shared::AppError;
use tracing::info;
use uuid::Uuid;

use crate::entities::products;

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Product name already used.
    #[error("Product name already exists: {0}")]
    DuplicateName(String),

    /// Product is referenced by orders.
    #[error("Product {0} has orders and cannot be deleted")]
    InUse(Uuid),

    /// Rate or stock rejected.
    #[error(transparent)]
    Invalid(#[from] OrderError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for AppError {
    fn from(e: ProductError) -> Self {
        let message = e.to_string();
        match e {
            ProductError::NotFound(_) => Self::NotFound(message),
            ProductError::DuplicateName(_) | ProductError::InUse(_) => Self::Conflict(message),
            ProductError::Invalid(_) => Self::Validation(message),
            ProductError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Unique display name.
    pub name: String,
    /// Category.
    pub kind: ProductKind,
    /// Price per bag.
    pub rate_per_bag: Decimal,
    /// Initial stock.
    pub stock_bags: i32,
}

/// Input for updating a product.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New rate per bag. Completed orders keep their snapshot.
    pub rate_per_bag: Option<Decimal>,
    /// Bags added to stock (restock).
    pub add_stock_bags: Option<i32>,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: Arc<DatabaseConnection>,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Adds a product to the catalogue.
    pub async fn create(&self, input: CreateProductInput) -> Result<products::Model, ProductError> {
        let rate = round_rate(input.rate_per_bag);
        OrderLifecycle::validate_product(rate, input.stock_bags)?;

        let name = input.name.trim().to_string();
        let existing = products::Entity::find()
            .filter(products::Column::Name.eq(&name))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(ProductError::DuplicateName(name));
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.clone()),
            kind: Set(input.kind.into()),
            rate_per_bag: Set(rate),
            stock_bags: Set(input.stock_bags),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateName(name),
            _ => ProductError::Database(e),
        })?;

        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Finds a product by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Lists the catalogue by name.
    pub async fn list(&self) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(self.db.as_ref())
            .await
    }

    /// Changes the rate and/or restocks a product.
    ///
    /// Restock is applied as `stock_bags + n` in SQL so it composes with a
    /// concurrent completion's conditional decrement.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<products::Model, ProductError> {
        let existing = self.find_by_id(id).await?;

        let rate = input.rate_per_bag.map_or(existing.rate_per_bag, round_rate);
        let added = input.add_stock_bags.unwrap_or(0);
        OrderLifecycle::validate_product(rate, added)?;

        let mut update = products::Entity::update_many()
            .col_expr(products::Column::RatePerBag, Expr::value(rate))
            .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(products::Column::Id.eq(id));
        if added > 0 {
            update = update.col_expr(
                products::Column::StockBags,
                Expr::col(products::Column::StockBags).add(added),
            );
        }
        let result = update.exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        let updated = self.find_by_id(id).await?;
        info!(
            product_id = %id,
            rate_per_bag = %updated.rate_per_bag,
            added_bags = added,
            stock_bags = updated.stock_bags,
            "Product updated"
        );
        Ok(updated)
    }

    /// Removes a product that no order references.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProductError> {
        let result = products::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => ProductError::InUse(id),
                _ => ProductError::Database(e),
            })?;
        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
