//! Error responses.
//!
//! Every error body is `{"error": <code>, "message": <text>}`. Server-side
//! failures hide their text behind a generic message; when detail exposure
//! is enabled the original text is added under `detail`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tealeaf_shared::AppError;
use tracing::error;
use validator::ValidationErrors;

/// Builds a JSON error response.
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Maps an [`AppError`] to its response.
pub fn app_error_response(err: &AppError, expose_details: bool) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.is_internal() {
        error!(error = %err, "Request failed");
        let mut body = json!({
            "error": err.error_code(),
            "message": "An internal error occurred"
        });
        if expose_details {
            body["detail"] = json!(err.message());
        }
        return (status, Json(body)).into_response();
    }

    error_response(status, err.error_code(), err.message())
}

/// 400 response for a request body that failed `validator` checks.
pub fn validation_response(errors: &ValidationErrors) -> Response {
    error_response(StatusCode::BAD_REQUEST, "validation_error", errors.to_string())
}

/// 403 response.
pub fn forbidden(message: &str) -> Response {
    error_response(StatusCode::FORBIDDEN, "forbidden", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_database_error_hidden_in_production() {
        let response = app_error_response(&AppError::Database("relation missing".into()), false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn test_database_error_detail_in_development() {
        let response = app_error_response(&AppError::Database("relation missing".into()), true);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "relation missing");
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        let response =
            app_error_response(&AppError::NotFound("Payment not found: 7".into()), false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Payment not found: 7");
    }
}
