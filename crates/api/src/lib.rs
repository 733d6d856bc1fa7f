//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Error to response mapping
//! - The in-process driver location hub

pub mod error;
pub mod location;
pub mod middleware;
pub mod routes;

use axum::{Router, response::Response};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tealeaf_core::settlement::SettlementPolicy;
use tealeaf_shared::{AppError, JwtService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use location::LocationHub;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Transport charge and other settlement settings.
    pub settlement_policy: SettlementPolicy,
    /// Whether 500-class responses carry the internal error text.
    pub expose_error_details: bool,
    /// Live driver locations.
    pub locations: LocationHub,
}

impl AppState {
    /// Converts a domain error into its HTTP response.
    pub fn error_response(&self, err: impl Into<AppError>) -> Response {
        error::app_error_response(&err.into(), self.expose_error_details)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
