//! Loan routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::StatusRequest;
use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
};
use tealeaf_core::deduction::{LoanStatus, LoanTerms};
use tealeaf_db::repositories::{CreateLoanInput, LoanRepository};
use tealeaf_shared::AppError;

/// Creates the loan routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(request_loan))
        .route("/loans/{loan_id}", get(get_loan).delete(delete_loan))
        .route("/loans/{loan_id}/status", put(update_loan_status))
        .route("/suppliers/{supplier_id}/loans", get(list_supplier_loans))
}

/// Request body for a loan request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoanRequest {
    /// Borrowing supplier.
    pub supplier_id: String,
    /// Amount borrowed.
    pub principal_amount: Decimal,
    /// Repayment period in months; 0 means a single repayment.
    #[serde(default)]
    pub duration_months: i32,
    /// Stated purpose.
    #[validate(length(min = 1, max = 500))]
    pub purpose: String,
    /// Issue date; defaults to today.
    pub issued_on: Option<NaiveDate>,
}

/// POST `/loans` - Request a loan (admin or the supplier).
async fn request_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<LoanRequest>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&payload.supplier_id) {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }
    let repo = LoanRepository::new(state.db.clone());

    let input = CreateLoanInput {
        supplier_id: payload.supplier_id,
        terms: LoanTerms {
            principal_amount: payload.principal_amount,
            duration_months: payload.duration_months,
        },
        purpose: payload.purpose,
        issued_on: payload.issued_on,
    };

    match repo.create(input).await {
        Ok(loan) => (StatusCode::CREATED, Json(loan)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/loans/{loan_id}` - Get a loan.
async fn get_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> Response {
    let repo = LoanRepository::new(state.db.clone());

    match repo.find_by_id(loan_id).await {
        Ok(loan) => {
            if let Err(response) = auth.ensure_supplier_access(&loan.supplier_id) {
                return response;
            }
            (StatusCode::OK, Json(loan)).into_response()
        }
        Err(e) => state.error_response(e),
    }
}

/// GET `/suppliers/{supplier_id}/loans` - List a supplier's loans.
async fn list_supplier_loans(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    let repo = LoanRepository::new(state.db.clone());

    match repo.list_for_supplier(&supplier_id).await {
        Ok(loans) => (StatusCode::OK, Json(json!({ "loans": loans }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// PUT `/loans/{loan_id}/status` - Approve or settle a loan (admin).
async fn update_loan_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let Some(status) = LoanStatus::parse(&payload.status) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "Invalid loan status. Must be one of: pending, approved, successful",
        );
    };
    let repo = LoanRepository::new(state.db.clone());

    match repo.update_status(loan_id, status).await {
        Ok(loan) => (StatusCode::OK, Json(loan)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// DELETE `/loans/{loan_id}` - Delete a loan (admin).
async fn delete_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = LoanRepository::new(state.db.clone());

    match repo.delete(loan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => state.error_response(e),
    }
}
