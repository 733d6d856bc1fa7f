//! Supplier and driver profile routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    AppState,
    error::{forbidden, validation_response},
    middleware::AuthUser,
};
use tealeaf_db::repositories::{DriverRepository, SupplierRepository, UpdateSupplierInput};
use tealeaf_shared::{AppError, types::PageRequest};

/// Creates the supplier and driver routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers))
        .route(
            "/suppliers/{supplier_id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/drivers", get(list_drivers))
        .route("/drivers/{driver_id}", get(get_driver))
}

/// Request body for updating a supplier. Absent fields are left unchanged;
/// `null` clears an optional field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    /// Full name.
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    /// Postal address.
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    /// Bank name.
    #[serde(default, deserialize_with = "double_option")]
    pub bank_name: Option<Option<String>>,
    /// Bank account number.
    #[serde(default, deserialize_with = "double_option")]
    pub bank_account_no: Option<Option<String>>,
    /// Bank branch.
    #[serde(default, deserialize_with = "double_option")]
    pub bank_branch: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// GET `/suppliers` - List suppliers (admin).
async fn list_suppliers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = SupplierRepository::new(state.db.clone());

    match repo.list(&page).await {
        Ok((suppliers, total)) => (
            StatusCode::OK,
            Json(json!({
                "suppliers": suppliers,
                "total": total,
                "page": page.page.max(1),
                "per_page": page.limit()
            })),
        )
            .into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/suppliers/{supplier_id}` - Get a supplier profile.
async fn get_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    let repo = SupplierRepository::new(state.db.clone());

    match repo.find_by_id(&supplier_id).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// PUT `/suppliers/{supplier_id}` - Update contact and bank details.
async fn update_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }
    let repo = SupplierRepository::new(state.db.clone());

    let input = UpdateSupplierInput {
        name: payload.name.map(|n| n.trim().to_string()),
        phone: payload.phone,
        address: payload.address,
        bank_name: payload.bank_name,
        bank_account_no: payload.bank_account_no,
        bank_branch: payload.bank_branch,
    };

    match repo.update(&supplier_id, input).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// DELETE `/suppliers/{supplier_id}` - Delete a supplier with no records (admin).
async fn delete_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = SupplierRepository::new(state.db.clone());

    match repo.delete(&supplier_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/drivers` - List drivers (admin).
async fn list_drivers(State(state): State<AppState>, auth: AuthUser) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = DriverRepository::new(state.db.clone());

    match repo.list().await {
        Ok(drivers) => (StatusCode::OK, Json(json!({ "drivers": drivers }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/drivers/{driver_id}` - Get a driver profile (admin or the driver).
async fn get_driver(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(driver_id): Path<String>,
) -> Response {
    if !auth.is_admin() && !auth.is_driver(&driver_id) {
        return forbidden("Access to this driver is not allowed");
    }
    let repo = DriverRepository::new(state.db.clone());

    match repo.find_by_id(&driver_id).await {
        Ok(driver) => (StatusCode::OK, Json(driver)).into_response(),
        Err(e) => state.error_response(e),
    }
}
