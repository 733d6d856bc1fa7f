//! Leaf collection routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use tealeaf_core::auth::AccountRole;
use tealeaf_core::collection::LeafWeighing;
use tealeaf_db::repositories::{CollectionRepository, RecordCollectionInput, UpdateCollectionInput};
use tealeaf_shared::{AppError, types::PageRequest};

/// Creates the collection routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/collections", post(record_collection))
        .route(
            "/collections/{collection_id}",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .route(
            "/suppliers/{supplier_id}/collections",
            get(list_supplier_collections),
        )
        .route(
            "/suppliers/{supplier_id}/collections/summary",
            get(supplier_summary),
        )
}

/// Request body for recording a delivery.
#[derive(Debug, Deserialize)]
pub struct RecordCollectionRequest {
    /// Delivering supplier.
    pub supplier_id: String,
    /// Weight on the scale.
    pub gross_weight_kg: Decimal,
    /// Water deduction.
    pub water_weight_kg: Decimal,
    /// Bag deduction.
    pub bag_weight_kg: Decimal,
    /// Rate per kg in force today.
    pub rate_at_collection: Decimal,
    /// Time of weighing; defaults to now.
    pub collected_at: Option<DateTime<Utc>>,
}

/// Request body for correcting a delivery.
#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    /// New gross weight.
    pub gross_weight_kg: Option<Decimal>,
    /// New water deduction.
    pub water_weight_kg: Option<Decimal>,
    /// New bag deduction.
    pub bag_weight_kg: Option<Decimal>,
    /// New rate.
    pub rate_at_collection: Option<Decimal>,
}

/// POST `/collections` - Record a weighed delivery (driver or admin).
async fn record_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordCollectionRequest>,
) -> Response {
    if let Err(response) = auth.ensure_collection_writer() {
        return response;
    }
    let repo = CollectionRepository::new(state.db.clone());

    let driver_id = (auth.role() == Some(AccountRole::Driver)).then(|| auth.login().to_string());
    let input = RecordCollectionInput {
        supplier_id: payload.supplier_id,
        driver_id,
        weighing: LeafWeighing {
            gross_weight_kg: payload.gross_weight_kg,
            water_weight_kg: payload.water_weight_kg,
            bag_weight_kg: payload.bag_weight_kg,
            rate_at_collection: payload.rate_at_collection,
        },
        collected_at: payload.collected_at,
    };

    match repo.record(input).await {
        Ok(collection) => (StatusCode::CREATED, Json(collection)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/collections/{collection_id}` - Get a delivery.
async fn get_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(collection_id): Path<Uuid>,
) -> Response {
    let repo = CollectionRepository::new(state.db.clone());

    match repo.find_by_id(collection_id).await {
        Ok(collection) => {
            if let Err(response) = auth.ensure_collection_reader(&collection.supplier_id) {
                return response;
            }
            (StatusCode::OK, Json(collection)).into_response()
        }
        Err(e) => state.error_response(e),
    }
}

/// PUT `/collections/{collection_id}` - Correct a delivery (driver or admin).
async fn update_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(collection_id): Path<Uuid>,
    Json(payload): Json<UpdateCollectionRequest>,
) -> Response {
    if let Err(response) = auth.ensure_collection_writer() {
        return response;
    }
    let repo = CollectionRepository::new(state.db.clone());

    let input = UpdateCollectionInput {
        gross_weight_kg: payload.gross_weight_kg,
        water_weight_kg: payload.water_weight_kg,
        bag_weight_kg: payload.bag_weight_kg,
        rate_at_collection: payload.rate_at_collection,
    };

    match repo.update(collection_id, input).await {
        Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
        Err(e) => state.error_response(e),
    }
}

/// DELETE `/collections/{collection_id}` - Delete a delivery (driver or admin).
async fn delete_collection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(collection_id): Path<Uuid>,
) -> Response {
    if let Err(response) = auth.ensure_collection_writer() {
        return response;
    }
    let repo = CollectionRepository::new(state.db.clone());

    match repo.delete(collection_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => state.error_response(e),
    }
}

/// GET `/suppliers/{supplier_id}/collections` - Page through a supplier's deliveries.
async fn list_supplier_collections(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
    Query(page): Query<PageRequest>,
) -> Response {
    if let Err(response) = auth.ensure_collection_reader(&supplier_id) {
        return response;
    }
    let repo = CollectionRepository::new(state.db.clone());

    match repo.list_for_supplier(&supplier_id, &page).await {
        Ok((collections, total)) => (
            StatusCode::OK,
            Json(json!({
                "collections": collections,
                "total": total,
                "page": page.page.max(1),
                "per_page": page.limit()
            })),
        )
            .into_response(),
        Err(e) => state.error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/suppliers/{supplier_id}/collections/summary` - Totals over every delivery.
async fn supplier_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<String>,
) -> Response {
    if let Err(response) = auth.ensure_collection_reader(&supplier_id) {
        return response;
    }
    let repo = CollectionRepository::new(state.db.clone());

    match repo.summary_for_supplier(&supplier_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => state.error_response(e),
    }
}
