//! Settlement routes.
//!
//! Preview computes without writing; create persists a snapshot.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::StatusRequest;
use crate::{AppState, error::error_response, middleware::AuthUser};
use tealeaf_core::settlement::{
    SettlementBreakdown, SettlementError, SettlementOverrides, SettlementStatus,
};
use tealeaf_db::repositories::{CreatePaymentInput, PaymentError, SettlementRepository};
use tealeaf_shared::AppError;

/// Creates the settlement routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settlements", post(create_settlement))
        .route("/settlements/preview", get(preview_settlement))
        .route(
            "/settlements/{payment_id}",
            get(get_settlement).delete(archive_settlement),
        )
        .route(
            "/settlements/{payment_id}/status",
            put(update_settlement_status),
        )
        .route(
            "/suppliers/{supplier_id}/settlements",
            get(list_supplier_settlements),
        )
}

/// Query for a settlement preview.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Supplier to settle.
    #[serde(alias = "supplierId")]
    pub supplier_id: String,
}

/// Preview body as the mobile client reads it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreviewResponse {
    /// Income from every delivery.
    pub gross_income: Decimal,
    /// Outstanding loans.
    pub loan_amount: Decimal,
    /// Outstanding advances.
    pub advance_amount: Decimal,
    /// Completed product orders.
    pub products_amount: Decimal,
    /// Flat transport charge.
    pub transport_charge: Decimal,
    /// Payable amount; negative when the supplier owes.
    pub final_total: Decimal,
}

impl From<SettlementBreakdown> for PreviewResponse {
    fn from(b: SettlementBreakdown) -> Self {
        Self {
            gross_income: b.gross_income,
            loan_amount: b.loan_amount,
            advance_amount: b.advance_amount,
            products_amount: b.products_amount,
            transport_charge: b.transport_charge,
            final_total: b.final_total,
        }
    }
}

/// Request body for persisting a settlement.
#[derive(Debug, Deserialize)]
pub struct CreateSettlementRequest {
    /// Supplier to settle.
    #[serde(alias = "supplierId")]
    pub supplier_id: String,
    /// Components replacing the computed ones, given at the top level.
    #[serde(flatten)]
    pub overrides: SettlementOverrides,
    /// Retry key; a repeat returns the first record.
    #[serde(alias = "idempotencyKey")]
    pub idempotency_key: Option<String>,
    /// Payment date; defaults to today.
    #[serde(alias = "paymentDate")]
    pub payment_date: Option<NaiveDate>,
}

fn payment_error_response(state: &AppState, e: PaymentError) -> Response {
    match &e {
        PaymentError::Rejected(SettlementError::InvalidTransition { .. }) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_transition", e.to_string())
        }
        _ => state.error_response(e),
    }
}

/// GET `/settlements/preview?supplier_id=` - Compute without persisting.
async fn preview_settlement(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PreviewQuery>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&query.supplier_id) {
        return response;
    }
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    match repo.preview(&query.supplier_id).await {
        Ok(breakdown) => {
            (StatusCode::OK, Json(PreviewResponse::from(breakdown))).into_response()
        }
        Err(e) => payment_error_response(&state, e),
    }
}

/// POST `/settlements` - Persist a settlement (admin).
///
/// Responds 201 for a new record and 200 when the idempotency key
/// matched an earlier one.
async fn create_settlement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSettlementRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    let input = CreatePaymentInput {
        supplier_id: payload.supplier_id,
        overrides: payload.overrides,
        idempotency_key: payload.idempotency_key,
        payment_date: payload.payment_date,
    };

    match repo.create(input).await {
        Ok((payment, true)) => (StatusCode::CREATED, Json(payment)).into_response(),
        Ok((payment, false)) => (StatusCode::OK, Json(payment)).into_response(),
        Err(e) => payment_error_response(&state, e),
    }
}

/// GET `/settlements/{payment_id}` - Get a settlement.
async fn get_settlement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Response {
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    match repo.find_by_id(payment_id).await {
        Ok(payment) => {
            if let Err(response) = auth.ensure_supplier_access(&payment.supplier_id) {
                return response;
            }
            (StatusCode::OK, Json(payment)).into_response()
        }
        Err(e) => payment_error_response(&state, e),
    }
}

/// GET `/suppliers/{supplier_id}/settlements` - A supplier's payment history.
async fn list_supplier_settlements(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    match repo.list_for_supplier(&supplier_id).await {
        Ok(payments) => (StatusCode::OK, Json(json!({ "settlements": payments }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// PUT `/settlements/{payment_id}/status` - Move a settlement forward (admin).
async fn update_settlement_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let status = match SettlementStatus::parse(&payload.status) {
        Ok(status) => status,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "invalid_status", e.to_string()),
    };
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    match repo.update_status(payment_id, status).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(e) => payment_error_response(&state, e),
    }
}

/// DELETE `/settlements/{payment_id}` - Archive a settlement (admin).
async fn archive_settlement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = SettlementRepository::new(state.db.clone(), state.settlement_policy);

    match repo.archive(payment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => payment_error_response(&state, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_preview_uses_pascal_case_fields() {
        let breakdown = SettlementBreakdown::from_components(
            dec!(1000),
            dec!(300),
            dec!(0),
            dec!(0),
            dec!(100),
        );
        let body = serde_json::to_value(PreviewResponse::from(breakdown)).unwrap();

        assert_eq!(body["GrossIncome"], json!("1000"));
        assert_eq!(body["LoanAmount"], json!("300"));
        assert_eq!(body["FinalTotal"], json!("600"));
        assert!(body.get("final_total").is_none());
    }

    #[test]
    fn test_create_body_takes_top_level_overrides() {
        let body: CreateSettlementRequest = serde_json::from_value(json!({
            "supplierId": "S1",
            "loan_amount": "0",
            "transportCharge": "0",
        }))
        .unwrap();

        assert_eq!(body.supplier_id, "S1");
        assert_eq!(body.overrides.loan_amount, Some(Decimal::ZERO));
        assert_eq!(body.overrides.transport_charge, Some(Decimal::ZERO));
        assert_eq!(body.overrides.gross_income, None);
        assert!(body.idempotency_key.is_none());
    }

    #[test]
    fn test_create_body_without_overrides_is_empty() {
        let body: CreateSettlementRequest =
            serde_json::from_value(json!({ "supplier_id": "S1", "idempotency_key": "run-1" }))
                .unwrap();

        assert!(body.overrides.is_empty());
        assert_eq!(body.idempotency_key.as_deref(), Some("run-1"));
    }

    #[test]
    fn test_preview_query_accepts_camel_case() {
        let query: PreviewQuery = serde_json::from_str(r#"{"supplierId":"SUP-001"}"#).unwrap();
        assert_eq!(query.supplier_id, "SUP-001");
    }
}
