//! Liveness and readiness probes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, `ready` or `unavailable`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl HealthResponse {
    const fn new(status: &'static str) -> Self {
        Self {
            status,
            service: "tealeaf",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET `/health` - The process is up.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// GET `/health/ready` - The database answers.
async fn readiness(State(state): State<AppState>) -> Response {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("ready"))).into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new("unavailable")),
            )
                .into_response()
        }
    }
}

/// Creates the probe routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness))
}
