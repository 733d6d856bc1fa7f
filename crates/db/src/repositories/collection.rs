//! Leaf collection repository.
//!
//! Weighings are validated by [`LeafWeighing`] before they reach the table;
//! the stored net weight is always recomputed from the three weights.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tealeaf_core::collection::{
    CollectionAggregator, CollectionError, CollectionLine, CollectionSummary, LeafWeighing,
};
use tealeaf_shared::{AppError, types::PageRequest};
use tracing::info;
use uuid::Uuid;

use super::supplier_exists;
use crate::entities::leaf_collections;

/// Error types for leaf collection operations.
#[derive(Debug, thiserror::Error)]
pub enum LeafCollectionError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    NotFound(Uuid),

    /// Owning supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Weighing rejected.
    #[error(transparent)]
    Invalid(#[from] CollectionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LeafCollectionError> for AppError {
    fn from(e: LeafCollectionError) -> Self {
        let message = e.to_string();
        match e {
            LeafCollectionError::NotFound(_) | LeafCollectionError::SupplierNotFound(_) => {
                Self::NotFound(message)
            }
            LeafCollectionError::Invalid(_) => Self::Validation(message),
            LeafCollectionError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for recording a delivery.
#[derive(Debug, Clone)]
pub struct RecordCollectionInput {
    /// Owning supplier.
    pub supplier_id: String,
    /// Driver who weighed the leaf, if recorded by a driver.
    pub driver_id: Option<String>,
    /// Weights and the rate in force.
    pub weighing: LeafWeighing,
    /// Time of weighing; defaults to now.
    pub collected_at: Option<DateTime<Utc>>,
}

/// Corrections to a stored delivery.
#[derive(Debug, Clone, Default)]
pub struct UpdateCollectionInput {
    /// New gross weight.
    pub gross_weight_kg: Option<Decimal>,
    /// New water weight.
    pub water_weight_kg: Option<Decimal>,
    /// New bag weight.
    pub bag_weight_kg: Option<Decimal>,
    /// New rate.
    pub rate_at_collection: Option<Decimal>,
}

/// Leaf collection repository.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    db: Arc<DatabaseConnection>,
}

impl CollectionRepository {
    /// Creates a new collection repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Records a delivery. The rate is snapshotted as given.
    pub async fn record(
        &self,
        input: RecordCollectionInput,
    ) -> Result<leaf_collections::Model, LeafCollectionError> {
        let weighing = input.weighing.rounded();
        weighing.validate()?;
        if !supplier_exists(self.db.as_ref(), &input.supplier_id).await? {
            return Err(LeafCollectionError::SupplierNotFound(input.supplier_id));
        }

        let now = Utc::now();
        let collection = leaf_collections::ActiveModel {
            id: Set(Uuid::now_v7()),
            supplier_id: Set(input.supplier_id),
            driver_id: Set(input.driver_id),
            rate_at_collection: Set(weighing.rate_at_collection),
            gross_weight_kg: Set(weighing.gross_weight_kg),
            water_weight_kg: Set(weighing.water_weight_kg),
            bag_weight_kg: Set(weighing.bag_weight_kg),
            net_weight_kg: Set(weighing.net_weight_kg()),
            collected_at: Set(input.collected_at.unwrap_or(now).into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(
            collection_id = %collection.id,
            supplier_id = %collection.supplier_id,
            net_weight_kg = %collection.net_weight_kg,
            "Leaf collection recorded"
        );
        Ok(collection)
    }

    /// Finds a collection by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<leaf_collections::Model, LeafCollectionError> {
        leaf_collections::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(LeafCollectionError::NotFound(id))
    }

    /// Lists a supplier's collections, newest first.
    pub async fn list_for_supplier(
        &self,
        supplier_id: &str,
        page: &PageRequest,
    ) -> Result<(Vec<leaf_collections::Model>, u64), DbErr> {
        let query = leaf_collections::Entity::find()
            .filter(leaf_collections::Column::SupplierId.eq(supplier_id));
        let total = query.clone().count(self.db.as_ref()).await?;
        let items = query
            .order_by_desc(leaf_collections::Column::CollectedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await?;
        Ok((items, total))
    }

    /// Corrects a delivery and recomputes its net weight.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCollectionInput,
    ) -> Result<leaf_collections::Model, LeafCollectionError> {
        let existing = self.find_by_id(id).await?;

        let weighing = LeafWeighing {
            gross_weight_kg: input.gross_weight_kg.unwrap_or(existing.gross_weight_kg),
            water_weight_kg: input.water_weight_kg.unwrap_or(existing.water_weight_kg),
            bag_weight_kg: input.bag_weight_kg.unwrap_or(existing.bag_weight_kg),
            rate_at_collection: input
                .rate_at_collection
                .unwrap_or(existing.rate_at_collection),
        }
        .rounded();
        weighing.validate()?;

        let mut active = existing.into_active_model();
        active.gross_weight_kg = Set(weighing.gross_weight_kg);
        active.water_weight_kg = Set(weighing.water_weight_kg);
        active.bag_weight_kg = Set(weighing.bag_weight_kg);
        active.rate_at_collection = Set(weighing.rate_at_collection);
        active.net_weight_kg = Set(weighing.net_weight_kg());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        info!(collection_id = %id, "Leaf collection updated");
        Ok(updated)
    }

    /// Deletes a collection.
    pub async fn delete(&self, id: Uuid) -> Result<(), LeafCollectionError> {
        let result = leaf_collections::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(LeafCollectionError::NotFound(id));
        }
        info!(collection_id = %id, "Leaf collection deleted");
        Ok(())
    }

    /// Every collection of a supplier reduced to what the aggregator needs.
    pub async fn lines_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<Vec<CollectionLine>, DbErr> {
        let rows = leaf_collections::Entity::find()
            .filter(leaf_collections::Column::SupplierId.eq(supplier_id))
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CollectionLine {
                net_weight_kg: row.net_weight_kg,
                rate_at_collection: row.rate_at_collection,
            })
            .collect())
    }

    /// Delivery count, total net weight and gross income of a supplier.
    pub async fn summary_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<CollectionSummary, LeafCollectionError> {
        if !supplier_exists(self.db.as_ref(), supplier_id).await? {
            return Err(LeafCollectionError::SupplierNotFound(supplier_id.to_string()));
        }
        let lines = self.lines_for_supplier(supplier_id).await?;
        Ok(CollectionAggregator::summarize(&lines))
    }
}
