//! Live driver location routes.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::{
    AppState,
    error::{error_response, forbidden},
    middleware::AuthUser,
};
use tealeaf_core::location::{LocationFix, LocationUpdate};

/// Creates the location routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/drivers/{driver_id}/location",
            get(latest_location).post(publish_location),
        )
        .route("/drivers/{driver_id}/location/ws", get(watch_location))
}

/// POST `/drivers/{driver_id}/location` - Publish a fix (the driver or admin).
async fn publish_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(driver_id): Path<String>,
    Json(fix): Json<LocationFix>,
) -> Response {
    if !auth.is_admin() && !auth.is_driver(&driver_id) {
        return forbidden("Drivers may only publish their own location");
    }

    let update = match LocationUpdate::new(driver_id, fix, Utc::now()) {
        Ok(update) => update,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    let receivers = state.locations.publish(update.clone());
    debug!(driver_id = %update.driver_id, receivers, "Location published");
    (StatusCode::ACCEPTED, Json(update)).into_response()
}

/// GET `/drivers/{driver_id}/location` - Last known fix.
async fn latest_location(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(driver_id): Path<String>,
) -> Response {
    match state.locations.latest(&driver_id) {
        Some(update) => (StatusCode::OK, Json(update)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("No location reported for driver {driver_id}"),
        ),
    }
}

/// GET `/drivers/{driver_id}/location/ws` - Stream every later fix.
async fn watch_location(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(driver_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| stream_locations(socket, state, driver_id))
}

async fn stream_locations(socket: WebSocket, state: AppState, driver_id: String) {
    let mut rx = state.locations.subscribe(&driver_id);
    let (mut sender, mut receiver) = socket.split();
    debug!(driver_id = %driver_id, "Location watcher connected");

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    let text = match serde_json::to_string(&update) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, "Failed to encode location update");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(driver_id = %driver_id, skipped, "Location watcher lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(rx);
    state.locations.release(&driver_id);
    debug!(driver_id = %driver_id, "Location watcher disconnected");
}
