//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, error::forbidden};
use tealeaf_core::auth::AccountRole;
use tealeaf_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated account.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     if let Err(response) = auth.ensure_supplier_access(&supplier_id) {
///         return response;
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the login code: supplier or driver register code, or admin username.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.0.login
    }

    /// Returns the account's role. Unknown role strings grant nothing.
    #[must_use]
    pub fn role(&self) -> Option<AccountRole> {
        AccountRole::parse(&self.0.role)
    }

    /// Returns true for office staff.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Some(AccountRole::Admin)
    }

    /// Returns true if this account is the given supplier.
    #[must_use]
    pub fn is_supplier(&self, supplier_id: &str) -> bool {
        self.role() == Some(AccountRole::Supplier) && self.login() == supplier_id
    }

    /// Returns true if this account is the given driver.
    #[must_use]
    pub fn is_driver(&self, driver_id: &str) -> bool {
        self.role() == Some(AccountRole::Driver) && self.login() == driver_id
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    /// Allows admins only.
    pub fn ensure_admin(&self) -> Result<(), Response> {
        if self.role().is_some_and(|r| r.can_manage_finance()) {
            Ok(())
        } else {
            Err(forbidden("Admin access required"))
        }
    }

    /// Allows admins and the supplier itself.
    pub fn ensure_supplier_access(&self, supplier_id: &str) -> Result<(), Response> {
        if self.is_admin() || self.is_supplier(supplier_id) {
            Ok(())
        } else {
            Err(forbidden("Access to this supplier's records is not allowed"))
        }
    }

    /// Allows drivers, admins and the supplier itself to read collections.
    pub fn ensure_collection_reader(&self, supplier_id: &str) -> Result<(), Response> {
        if self.role().is_some_and(|r| r.can_view_all_collections())
            || self.is_supplier(supplier_id)
        {
            Ok(())
        } else {
            Err(forbidden("Access to this supplier's collections is not allowed"))
        }
    }

    /// Allows drivers and admins to write collections.
    pub fn ensure_collection_writer(&self) -> Result<(), Response> {
        if self.role().is_some_and(|r| r.can_record_collections()) {
            Ok(())
        } else {
            Err(forbidden("Only drivers and admins may record collections"))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
