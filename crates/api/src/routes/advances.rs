//! Advance routes.

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

use super::StatusRequest;
use crate::{AppState, error::error_response, middleware::AuthUser};
use tealeaf_core::deduction::AdvanceStatus;
use tealeaf_db::repositories::AdvanceRepository;
use tealeaf_shared::AppError;

/// Creates the advance routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/advances", post(request_advance))
        .route("/advances/{advance_id}", get(get_advance).delete(delete_advance))
        .route("/advances/{advance_id}/status", put(update_advance_status))
        .route("/suppliers/{supplier_id}/advances", get(list_supplier_advances))
}

/// Request body for an advance request.
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    /// Requesting supplier.
    pub supplier_id: String,
    /// Amount requested.
    pub amount: Decimal,
    /// Date of the advance; defaults to today.
    pub advance_date: Option<NaiveDate>,
}

/// POST `/advances` - Request an advance (admin or the supplier).
async fn request_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AdvanceRequest>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&payload.supplier_id) {
        return response;
    }
    let repo = AdvanceRepository::new(state.db.clone());

    match repo
        .create(&payload.supplier_id, payload.amount, payload.advance_date)
        .await
    {
        Ok(advance) => (StatusCode::CREATED, Json(advance)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/advances/{advance_id}` - Get an advance.
async fn get_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(advance_id): Path<Uuid>,
) -> Response {
    let repo = AdvanceRepository::new(state.db.clone());

    match repo.find_by_id(advance_id).await {
        Ok(advance) => {
            if let Err(response) = auth.ensure_supplier_access(&advance.supplier_id) {
                return response;
            }
            (StatusCode::OK, Json(advance)).into_response()
        }
        Err(e) => state.error_response(e),
    }
}

/// GET `/suppliers/{supplier_id}/advances` - List a supplier's advances.
async fn list_supplier_advances(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    let repo = AdvanceRepository::new(state.db.clone());

    match repo.list_for_supplier(&supplier_id).await {
        Ok(advances) => (StatusCode::OK, Json(json!({ "advances": advances }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// PUT `/advances/{advance_id}/status` - Mark an advance transferred (admin).
async fn update_advance_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(advance_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let Some(status) = AdvanceStatus::parse(&payload.status) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "Invalid advance status. Must be one of: pending, transferred",
        );
    };
    let repo = AdvanceRepository::new(state.db.clone());

    match repo.update_status(advance_id, status).await {
        Ok(advance) => (StatusCode::OK, Json(advance)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// DELETE `/advances/{advance_id}` - Delete an advance (admin).
async fn delete_advance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(advance_id): Path<Uuid>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = AdvanceRepository::new(state.db.clone());

    match repo.delete(advance_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => state.error_response(e),
    }
}
