//! Settlement (payment) repository.
//!
//! Previewing never writes. Creating persists a snapshot whose amounts are
//! immutable afterwards; only the status moves (forward) and a record can
//! be archived instead of deleted.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, sea_query::Expr,
};
use tealeaf_core::settlement::{
    SettlementBreakdown, SettlementEngine, SettlementError, SettlementInputs, SettlementOverrides,
    SettlementPolicy, SettlementStatus, StatusChange,
};
use tealeaf_shared::AppError;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    AdvanceRepository, CollectionRepository, LoanRepository, OrderRepository, supplier_exists,
};
use crate::entities::payments;

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Payment not found or archived.
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    /// Idempotency key belongs to an archived payment.
    #[error("Idempotency key already used by an archived payment: {0}")]
    KeyArchived(String),

    /// Override or status change rejected.
    #[error(transparent)]
    Rejected(#[from] SettlementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        let message = e.to_string();
        match e {
            PaymentError::NotFound(_) | PaymentError::SupplierNotFound(_) => {
                Self::NotFound(message)
            }
            PaymentError::KeyArchived(_) => Self::Conflict(message),
            PaymentError::Rejected(_) => Self::Validation(message),
            PaymentError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for persisting a settlement.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentInput {
    /// Supplier being settled.
    pub supplier_id: String,
    /// Components that replace the computed ones.
    pub overrides: SettlementOverrides,
    /// Caller key that makes a retried create return the first record.
    pub idempotency_key: Option<String>,
    /// Payment date; defaults to today.
    pub payment_date: Option<NaiveDate>,
}

/// Settlement repository.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: Arc<DatabaseConnection>,
    policy: SettlementPolicy,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, policy: SettlementPolicy) -> Self {
        Self {
            db: db.into(),
            policy,
        }
    }

    /// Computes the current settlement for a supplier without persisting it.
    ///
    /// Amounts are rounded to cents exactly as `create` stores them.
    pub async fn preview(&self, supplier_id: &str) -> Result<SettlementBreakdown, PaymentError> {
        if !supplier_exists(self.db.as_ref(), supplier_id).await? {
            return Err(PaymentError::SupplierNotFound(supplier_id.to_string()));
        }

        let collections = CollectionRepository::new(self.db.clone())
            .lines_for_supplier(supplier_id)
            .await?;
        let loans = LoanRepository::new(self.db.clone())
            .lines_for_supplier(supplier_id)
            .await?;
        let advances = AdvanceRepository::new(self.db.clone())
            .lines_for_supplier(supplier_id)
            .await?;
        let orders = OrderRepository::new(self.db.clone())
            .charges_for_supplier(supplier_id)
            .await?;

        let inputs = SettlementInputs {
            collections: &collections,
            loans: &loans,
            advances: &advances,
            orders: &orders,
        };
        Ok(SettlementEngine::compute(&inputs, &self.policy).rounded_to_cents())
    }

    /// Persists a settlement snapshot in `Pending`.
    ///
    /// Returns the record and whether it was newly created. A repeated
    /// idempotency key for the same supplier returns the first record.
    pub async fn create(
        &self,
        input: CreatePaymentInput,
    ) -> Result<(payments::Model, bool), PaymentError> {
        if let Some(key) = &input.idempotency_key {
            if let Some(existing) = self.find_by_key(&input.supplier_id, key).await? {
                return Ok((existing, false));
            }
        }

        let computed = self.preview(&input.supplier_id).await?;
        let breakdown =
            SettlementEngine::apply_overrides(&computed, &input.overrides)?.rounded_to_cents();

        let now = Utc::now();
        let inserted = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            supplier_id: Set(input.supplier_id.clone()),
            gross_income: Set(breakdown.gross_income),
            loan_amount: Set(breakdown.loan_amount),
            advance_amount: Set(breakdown.advance_amount),
            products_amount: Set(breakdown.products_amount),
            transport_charge: Set(breakdown.transport_charge),
            final_total: Set(breakdown.final_total),
            payment_date: Set(input.payment_date.unwrap_or_else(|| now.date_naive())),
            status: Set(SettlementStatus::Pending.into()),
            idempotency_key: Set(input.idempotency_key.clone()),
            archived_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db.as_ref())
        .await;

        match inserted {
            Ok(payment) => {
                info!(
                    payment_id = %payment.id,
                    supplier_id = %payment.supplier_id,
                    final_total = %payment.final_total,
                    overridden = !input.overrides.is_empty(),
                    "Settlement created"
                );
                Ok((payment, true))
            }
            Err(e) => match (e.sql_err(), &input.idempotency_key) {
                (Some(SqlErr::UniqueConstraintViolation(_)), Some(key)) => {
                    self.recover_key_race(&input.supplier_id, key, e).await
                }
                _ => Err(PaymentError::Database(e)),
            },
        }
    }

    /// Returns the record of a concurrent create that took `key` first.
    async fn recover_key_race(
        &self,
        supplier_id: &str,
        key: &str,
        insert_error: DbErr,
    ) -> Result<(payments::Model, bool), PaymentError> {
        warn!(supplier_id = %supplier_id, key = %key, "Idempotency key taken concurrently");
        self.find_by_key(supplier_id, key)
            .await?
            .map(|existing| (existing, false))
            .ok_or(PaymentError::Database(insert_error))
    }

    /// Finds a live payment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<payments::Model, PaymentError> {
        payments::Entity::find_by_id(id)
            .filter(payments::Column::ArchivedAt.is_null())
            .one(self.db.as_ref())
            .await?
            .ok_or(PaymentError::NotFound(id))
    }

    /// Lists a supplier's live payments, newest first.
    pub async fn list_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<Vec<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::SupplierId.eq(supplier_id))
            .filter(payments::Column::ArchivedAt.is_null())
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Moves a payment forward. Amounts are never recomputed.
    ///
    /// The write only matches the status that was validated, so a
    /// concurrent change makes it affect no row.
    pub async fn update_status(
        &self,
        id: Uuid,
        to: SettlementStatus,
    ) -> Result<payments::Model, PaymentError> {
        let payment = self.find_by_id(id).await?;

        let status = match SettlementEngine::transition(payment.status.into(), to) {
            Ok(StatusChange::Unchanged) => return Ok(payment),
            Ok(StatusChange::Changed(status)) => status,
            Err(e) => {
                warn!(payment_id = %id, error = %e, "Settlement status change rejected");
                return Err(e.into());
            }
        };

        let result = payments::Entity::update_many()
            .set(payments::ActiveModel {
                status: Set(status.into()),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(payments::Column::Id.eq(id))
            .filter(payments::Column::Status.eq(payment.status))
            .filter(payments::Column::ArchivedAt.is_null())
            .exec(self.db.as_ref())
            .await?;

        let current = self.find_by_id(id).await?;
        let from = SettlementStatus::from(current.status);
        if result.rows_affected == 0 && from != status {
            warn!(
                payment_id = %id,
                from = %from,
                to = %to,
                "Settlement status changed concurrently"
            );
            return Err(SettlementError::InvalidTransition { from, to }.into());
        }

        info!(payment_id = %id, status = %status, "Settlement status updated");
        Ok(current)
    }

    /// Archives a payment. It disappears from every read; the row is kept.
    pub async fn archive(&self, id: Uuid) -> Result<(), PaymentError> {
        let result = payments::Entity::update_many()
            .col_expr(payments::Column::ArchivedAt, Expr::value(Utc::now()))
            .filter(payments::Column::Id.eq(id))
            .filter(payments::Column::ArchivedAt.is_null())
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(PaymentError::NotFound(id));
        }
        info!(payment_id = %id, "Settlement archived");
        Ok(())
    }

    async fn find_by_key(
        &self,
        supplier_id: &str,
        key: &str,
    ) -> Result<Option<payments::Model>, PaymentError> {
        let existing = payments::Entity::find()
            .filter(payments::Column::SupplierId.eq(supplier_id))
            .filter(payments::Column::IdempotencyKey.eq(key))
            .one(self.db.as_ref())
            .await?;

        match existing {
            Some(payment) if payment.archived_at.is_some() => {
                Err(PaymentError::KeyArchived(key.to_string()))
            }
            other => Ok(other),
        }
    }
}
