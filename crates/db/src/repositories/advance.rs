//! Advance repository.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use tealeaf_core::deduction::{self, AdvanceLine, DeductionError};
use tealeaf_shared::AppError;
use tracing::info;
use uuid::Uuid;

use super::supplier_exists;
use crate::entities::{advances, sea_orm_active_enums::AdvanceStatus};

/// Error types for advance operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvanceError {
    /// Advance not found.
    #[error("Advance not found: {0}")]
    NotFound(Uuid),

    /// Owning supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Request rejected.
    #[error(transparent)]
    Invalid(#[from] DeductionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AdvanceError> for AppError {
    fn from(e: AdvanceError) -> Self {
        let message = e.to_string();
        match e {
            AdvanceError::NotFound(_) | AdvanceError::SupplierNotFound(_) => {
                Self::NotFound(message)
            }
            AdvanceError::Invalid(_) => Self::Validation(message),
            AdvanceError::Database(_) => Self::Database(message),
        }
    }
}

/// Advance repository.
#[derive(Debug, Clone)]
pub struct AdvanceRepository {
    db: Arc<DatabaseConnection>,
}

impl AdvanceRepository {
    /// Creates a new advance repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Records an advance request. The date defaults to today.
    pub async fn create(
        &self,
        supplier_id: &str,
        amount: Decimal,
        advance_date: Option<NaiveDate>,
    ) -> Result<advances::Model, AdvanceError> {
        let amount = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        deduction::validate_advance_amount(amount)?;
        if !supplier_exists(self.db.as_ref(), supplier_id).await? {
            return Err(AdvanceError::SupplierNotFound(supplier_id.to_string()));
        }

        let now = Utc::now();
        let advance = advances::ActiveModel {
            id: Set(Uuid::now_v7()),
            supplier_id: Set(supplier_id.to_string()),
            amount: Set(amount),
            advance_date: Set(advance_date.unwrap_or_else(|| now.date_naive())),
            status: Set(AdvanceStatus::Pending),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(
            advance_id = %advance.id,
            supplier_id = %advance.supplier_id,
            amount = %advance.amount,
            "Advance requested"
        );
        Ok(advance)
    }

    /// Finds an advance by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<advances::Model, AdvanceError> {
        advances::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AdvanceError::NotFound(id))
    }

    /// Lists a supplier's advances, newest first.
    pub async fn list_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<Vec<advances::Model>, DbErr> {
        advances::Entity::find()
            .filter(advances::Column::SupplierId.eq(supplier_id))
            .order_by_desc(advances::Column::AdvanceDate)
            .all(self.db.as_ref())
            .await
    }

    /// Sets an advance's status.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: deduction::AdvanceStatus,
    ) -> Result<advances::Model, AdvanceError> {
        let mut active = self.find_by_id(id).await?.into_active_model();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        info!(advance_id = %id, status = %status, "Advance status updated");
        Ok(updated)
    }

    /// Deletes an advance.
    pub async fn delete(&self, id: Uuid) -> Result<(), AdvanceError> {
        let result = advances::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(AdvanceError::NotFound(id));
        }
        info!(advance_id = %id, "Advance deleted");
        Ok(())
    }

    /// Every advance of a supplier reduced to what the resolver needs.
    pub async fn lines_for_supplier(&self, supplier_id: &str) -> Result<Vec<AdvanceLine>, DbErr> {
        let rows = advances::Entity::find()
            .filter(advances::Column::SupplierId.eq(supplier_id))
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| AdvanceLine {
                amount: row.amount,
                status: row.status.into(),
            })
            .collect())
    }
}
