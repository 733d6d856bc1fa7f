//! Supplier repository for database operations.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use tealeaf_shared::{AppError, types::PageRequest};
use tracing::info;

use crate::entities::suppliers;

/// Error types for supplier operations.
#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    NotFound(String),

    /// Supplier still owns collections, loans, advances, orders or payments.
    #[error("Supplier {0} still has records and cannot be deleted")]
    HasDependents(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SupplierError> for AppError {
    fn from(e: SupplierError) -> Self {
        let message = e.to_string();
        match e {
            SupplierError::NotFound(_) => Self::NotFound(message),
            SupplierError::HasDependents(_) => Self::Conflict(message),
            SupplierError::Database(_) => Self::Database(message),
        }
    }
}

/// Contact and bank fields a supplier may change.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<Option<String>>,
    /// New postal address.
    pub address: Option<Option<String>>,
    /// New bank name.
    pub bank_name: Option<Option<String>>,
    /// New bank account number.
    pub bank_account_no: Option<Option<String>>,
    /// New bank branch.
    pub bank_branch: Option<Option<String>>,
}

/// Supplier repository.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: Arc<DatabaseConnection>,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Finds a supplier by register code.
    pub async fn find_by_id(&self, id: &str) -> Result<suppliers::Model, SupplierError> {
        suppliers::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| SupplierError::NotFound(id.to_string()))
    }

    /// Lists suppliers ordered by register code.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<suppliers::Model>, u64), DbErr> {
        let total = suppliers::Entity::find().count(self.db.as_ref()).await?;
        let items = suppliers::Entity::find()
            .order_by_asc(suppliers::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db.as_ref())
            .await?;
        Ok((items, total))
    }

    /// Updates contact and bank fields. The register code never changes.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let mut active = self.find_by_id(id).await?.into_active_model();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(bank_name) = input.bank_name {
            active.bank_name = Set(bank_name);
        }
        if let Some(bank_account_no) = input.bank_account_no {
            active.bank_account_no = Set(bank_account_no);
        }
        if let Some(bank_branch) = input.bank_branch {
            active.bank_branch = Set(bank_branch);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        info!(supplier_id = %id, "Supplier updated");
        Ok(updated)
    }

    /// Deletes a supplier and its login.
    ///
    /// Child records are protected by `ON DELETE RESTRICT`; a supplier who
    /// still owns any of them is reported as [`SupplierError::HasDependents`].
    pub async fn delete(&self, id: &str) -> Result<(), SupplierError> {
        let result = suppliers::Entity::delete_by_id(id.to_string())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    SupplierError::HasDependents(id.to_string())
                }
                _ => SupplierError::Database(e),
            })?;

        if result.rows_affected == 0 {
            return Err(SupplierError::NotFound(id.to_string()));
        }
        info!(supplier_id = %id, "Supplier deleted");
        Ok(())
    }
}
