//! API route definitions.

use axum::{Router, middleware};
use serde::Deserialize;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod advances;
pub mod auth;
pub mod collections;
pub mod health;
pub mod loans;
pub mod locations;
pub mod orders;
pub mod products;
pub mod settlements;
pub mod suppliers;

/// Body of every status update endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Target status, parsed by the owning entity.
    pub status: String,
}

/// Creates the API router: public health and auth routes plus every
/// entity route behind the bearer token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(suppliers::routes())
        .merge(collections::routes())
        .merge(loans::routes())
        .merge(advances::routes())
        .merge(products::routes())
        .merge(orders::routes())
        .merge(settlements::routes())
        .merge(locations::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
