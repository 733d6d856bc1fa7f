//! Loan repository.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::RoundingStrategy;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use tealeaf_core::deduction::{self, DeductionError, LoanLine, LoanTerms};
use tealeaf_shared::AppError;
use tracing::info;
use uuid::Uuid;

use super::supplier_exists;
use crate::entities::{loans, sea_orm_active_enums::LoanStatus};

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Loan not found.
    #[error("Loan not found: {0}")]
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

impl From<LoanError> for AppError {
    fn from(e: LoanError) -> Self {
        let message = e.to_string();
        match e {
            LoanError::NotFound(_) | LoanError::SupplierNotFound(_) => Self::NotFound(message),
            LoanError::Invalid(_) => Self::Validation(message),
            LoanError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for requesting a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanInput {
    /// Borrowing supplier.
    pub supplier_id: String,
    /// Amount and duration.
    pub terms: LoanTerms,
    /// Stated purpose.
    pub purpose: String,
    /// Issue date; defaults to today.
    pub issued_on: Option<NaiveDate>,
}

/// Loan repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: Arc<DatabaseConnection>,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Records a loan request with its derived installment and due date.
    pub async fn create(&self, input: CreateLoanInput) -> Result<loans::Model, LoanError> {
        deduction::validate_purpose(&input.purpose)?;
        let terms = LoanTerms {
            principal_amount: input
                .terms
                .principal_amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            ..input.terms
        };
        let issued_on = input.issued_on.unwrap_or_else(|| Utc::now().date_naive());
        let schedule = terms.schedule(issued_on)?;

        if !supplier_exists(self.db.as_ref(), &input.supplier_id).await? {
            return Err(LoanError::SupplierNotFound(input.supplier_id));
        }

        let now = Utc::now().into();
        let loan = loans::ActiveModel {
            id: Set(Uuid::now_v7()),
            supplier_id: Set(input.supplier_id),
            principal_amount: Set(terms.principal_amount),
            duration_months: Set(terms.duration_months),
            purpose: Set(input.purpose.trim().to_string()),
            monthly_installment: Set(schedule.monthly_installment),
            issued_on: Set(issued_on),
            due_date: Set(schedule.due_date),
            status: Set(LoanStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        info!(
            loan_id = %loan.id,
            supplier_id = %loan.supplier_id,
            principal = %loan.principal_amount,
            "Loan requested"
        );
        Ok(loan)
    }

    /// Finds a loan by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<loans::Model, LoanError> {
        loans::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(LoanError::NotFound(id))
    }

    /// Lists a supplier's loans, newest first.
    pub async fn list_for_supplier(&self, supplier_id: &str) -> Result<Vec<loans::Model>, DbErr> {
        loans::Entity::find()
            .filter(loans::Column::SupplierId.eq(supplier_id))
            .order_by_desc(loans::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Sets a loan's status.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: deduction::LoanStatus,
    ) -> Result<loans::Model, LoanError> {
        let mut active = self.find_by_id(id).await?.into_active_model();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(self.db.as_ref()).await?;
        info!(loan_id = %id, status = %status, "Loan status updated");
        Ok(updated)
    }

    /// Deletes a loan.
    pub async fn delete(&self, id: Uuid) -> Result<(), LoanError> {
        let result = loans::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            return Err(LoanError::NotFound(id));
        }
        info!(loan_id = %id, "Loan deleted");
        Ok(())
    }

    /// Every loan of a supplier reduced to what the resolver needs.
    pub async fn lines_for_supplier(&self, supplier_id: &str) -> Result<Vec<LoanLine>, DbErr> {
        let rows = loans::Entity::find()
            .filter(loans::Column::SupplierId.eq(supplier_id))
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LoanLine {
                principal_amount: row.principal_amount,
                status: row.status.into(),
            })
            .collect())
    }
}
