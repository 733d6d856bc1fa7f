//! Product order routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::StatusRequest;
use crate::{
    AppState,
    error::{error_response, forbidden},
    middleware::AuthUser,
};
use tealeaf_core::order::{OrderError, OrderStatus};
use tealeaf_db::repositories::{OrderRepository, PlaceOrderInput, ProductOrderError};
use tealeaf_shared::AppError;

/// Creates the order routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/{order_id}", get(get_order).delete(delete_order))
        .route("/orders/{order_id}/status", put(update_order_status))
        .route("/suppliers/{supplier_id}/orders", get(list_supplier_orders))
}

/// Request body for placing an order.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Ordering supplier.
    pub supplier_id: String,
    /// Ordered product.
    pub product_id: Uuid,
    /// Bags ordered.
    pub quantity: i32,
    /// `pending` (default) or `completed` for a counter sale (admin only).
    pub status: Option<String>,
}

/// Maps order errors, giving stock and lifecycle rejections their own codes.
fn order_error_response(state: &AppState, e: ProductOrderError) -> Response {
    match &e {
        ProductOrderError::Rejected(OrderError::InsufficientStock { .. }) => {
            warn!(error = %e, "Order rejected for insufficient stock");
            error_response(StatusCode::BAD_REQUEST, "insufficient_stock", e.to_string())
        }
        ProductOrderError::Rejected(OrderError::InvalidTransition { .. }) => {
            error_response(StatusCode::BAD_REQUEST, "invalid_transition", e.to_string())
        }
        _ => state.error_response(e),
    }
}

/// POST `/orders` - Place an order (admin or the supplier).
async fn place_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&payload.supplier_id) {
        return response;
    }
    let status = match payload.status.as_deref().map(OrderStatus::parse) {
        None => OrderStatus::Pending,
        Some(Some(status)) => status,
        Some(None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_status",
                "Invalid order status. Must be one of: pending, completed",
            );
        }
    };
    if status == OrderStatus::Completed && !auth.is_admin() {
        return forbidden("Only admins may record completed sales");
    }
    let repo = OrderRepository::new(state.db.clone());

    let input = PlaceOrderInput {
        supplier_id: payload.supplier_id,
        product_id: payload.product_id,
        quantity: payload.quantity,
        status,
    };

    match repo.place(input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => order_error_response(&state, e),
    }
}

/// GET `/orders/{order_id}` - Get an order.
async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> Response {
    let repo = OrderRepository::new(state.db.clone());

    match repo.find_by_id(order_id).await {
        Ok(order) => {
            if let Err(response) = auth.ensure_supplier_access(&order.supplier_id) {
                return response;
            }
            (StatusCode::OK, Json(order)).into_response()
        }
        Err(e) => order_error_response(&state, e),
    }
}

/// GET `/suppliers/{supplier_id}/orders` - List a supplier's orders.
async fn list_supplier_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
        return response;
    }
    let repo = OrderRepository::new(state.db.clone());

    match repo.list_for_supplier(&supplier_id).await {
        Ok(orders) => (StatusCode::OK, Json(json!({ "orders": orders }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// PUT `/orders/{order_id}/status` - Move an order along its lifecycle (admin).
async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let Some(status) = OrderStatus::parse(&payload.status) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "Invalid order status. Must be one of: pending, delivered, completed, cancelled",
        );
    };
    let repo = OrderRepository::new(state.db.clone());

    match repo.update_status(order_id, status).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => order_error_response(&state, e),
    }
}

/// DELETE `/orders/{order_id}` - Delete a pending or cancelled order.
async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> Response {
    let repo = OrderRepository::new(state.db.clone());

    if !auth.is_admin() {
        match repo.find_by_id(order_id).await {
            Ok(order) if auth.is_supplier(&order.supplier_id) => {}
            Ok(_) => return forbidden("Access to this order is not allowed"),
            Err(e) => return order_error_response(&state, e),
        }
    }

    match repo.delete(order_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => order_error_response(&state, e),
    }
}
