//! Product catalogue routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
    middleware::AuthUser,
};
use tealeaf_core::order::ProductKind;
use tealeaf_db::repositories::{CreateProductInput, ProductRepository, UpdateProductInput};
use tealeaf_shared::AppError;

/// Creates the product routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Request body for adding a product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Unique display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// `fertilizer` or `tea_packet`.
    pub kind: String,
    /// Price per bag.
    pub rate_per_bag: Decimal,
    /// Initial stock in bags.
    #[serde(default)]
    pub stock_bags: i32,
}

/// Request body for repricing or restocking a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// New price per bag.
    pub rate_per_bag: Option<Decimal>,
    /// Bags to add to stock.
    pub add_stock_bags: Option<i32>,
}

/// GET `/products` - List the catalogue.
async fn list_products(State(state): State<AppState>, _auth: AuthUser) -> Response {
    let repo = ProductRepository::new(state.db.clone());

    match repo.list().await {
        Ok(products) => (StatusCode::OK, Json(json!({ "products": products }))).into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// POST `/products` - Add a product (admin).
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }
    let Some(kind) = ProductKind::parse(&payload.kind) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_kind",
            "Invalid product kind. Must be one of: fertilizer, tea_packet",
        );
    };
    let repo = ProductRepository::new(state.db.clone());

    let input = CreateProductInput {
        name: payload.name,
        kind,
        rate_per_bag: payload.rate_per_bag,
        stock_bags: payload.stock_bags,
    };

    match repo.create(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/products/{product_id}` - Get a product.
async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> Response {
    let repo = ProductRepository::new(state.db.clone());

    match repo.find_by_id(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// PUT `/products/{product_id}` - Reprice or restock (admin).
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = ProductRepository::new(state.db.clone());

    let input = UpdateProductInput {
        rate_per_bag: payload.rate_per_bag,
        add_stock_bags: payload.add_stock_bags,
    };

    match repo.update(product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// DELETE `/products/{product_id}` - Remove a product no order references (admin).
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> Response {
    if let Err(response) = auth.ensure_admin() {
        return response;
    }
    let repo = ProductRepository::new(state.db.clone());

    match repo.delete(product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => state.error_response(e),
    }
}
