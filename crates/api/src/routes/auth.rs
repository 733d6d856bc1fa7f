//! Authentication routes: registration and login.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    AppState,
    error::{error_response, validation_response},
};
use tealeaf_core::{
    auth::{AccountRole, hash_password, validate_password, verify_password},
    registry::RegisterCode,
};
use tealeaf_db::repositories::{AccountRepository, RegisterDriverInput, RegisterSupplierInput};
use tealeaf_shared::auth::{LoginRequest, LoginResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/suppliers/register", post(register_supplier))
        .route("/auth/drivers/register", post(register_driver))
        .route("/auth/login", post(login))
}

/// Request body for supplier registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterSupplierRequest {
    /// Register code printed on the supplier passbook.
    pub supplier_id: String,
    /// Full name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    /// Postal address.
    #[validate(length(max = 500))]
    pub address: Option<String>,
    /// Bank name.
    #[validate(length(max = 100))]
    pub bank_name: Option<String>,
    /// Bank account number.
    #[validate(length(max = 64))]
    pub bank_account_no: Option<String>,
    /// Bank branch.
    #[validate(length(max = 100))]
    pub bank_branch: Option<String>,
    /// Login password.
    pub password: String,
}

/// Request body for driver registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDriverRequest {
    /// Register code assigned by the office.
    pub driver_id: String,
    /// Full name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Phone number.
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    /// Lorry registration.
    #[validate(length(max = 32))]
    pub vehicle_number: Option<String>,
    /// Login password.
    pub password: String,
}

/// Validates the code and password and hashes the password.
fn prepare_credentials(raw_code: &str, password: &str) -> Result<(RegisterCode, String), Response> {
    let code = RegisterCode::parse(raw_code).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, "invalid_register_code", e.to_string())
    })?;
    validate_password(password)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, "weak_password", e.to_string()))?;
    let hash = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "An error occurred during registration",
        )
    })?;
    Ok((code, hash))
}

/// POST `/auth/suppliers/register` - Create a supplier and its login.
async fn register_supplier(
    State(state): State<AppState>,
    Json(payload): Json<RegisterSupplierRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }
    let (code, password_hash) = match prepare_credentials(&payload.supplier_id, &payload.password)
    {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };

    let repo = AccountRepository::new(state.db.clone());
    let input = RegisterSupplierInput {
        code,
        name: payload.name.trim().to_string(),
        phone: payload.phone,
        address: payload.address,
        bank_name: payload.bank_name,
        bank_account_no: payload.bank_account_no,
        bank_branch: payload.bank_branch,
        password_hash,
    };

    match repo.register_supplier(input).await {
        Ok((supplier, account)) => (
            StatusCode::CREATED,
            Json(json!({
                "supplier": supplier,
                "login": account.login,
                "role": AccountRole::Supplier
            })),
        )
            .into_response(),
        Err(e) => state.error_response(e),
    }
}

/// POST `/auth/drivers/register` - Create a driver and its login.
async fn register_driver(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDriverRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }
    let (code, password_hash) = match prepare_credentials(&payload.driver_id, &payload.password) {
        Ok(prepared) => prepared,
        Err(response) => return response,
    };

    let repo = AccountRepository::new(state.db.clone());
    let input = RegisterDriverInput {
        code,
        name: payload.name.trim().to_string(),
        phone: payload.phone,
        vehicle_number: payload.vehicle_number,
        password_hash,
    };

    match repo.register_driver(input).await {
        Ok((driver, account)) => (
            StatusCode::CREATED,
            Json(json!({
                "driver": driver,
                "login": account.login,
                "role": AccountRole::Driver
            })),
        )
            .into_response(),
        Err(e) => state.error_response(e),
    }
}

fn invalid_credentials() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "Invalid login or password",
    )
}

/// POST `/auth/login` - Authenticate and return an access token.
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let repo = AccountRepository::new(state.db.clone());

    let account = match repo.find_by_login(payload.login.trim()).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            info!(login = %payload.login, "Login attempt for unknown account");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred during login",
            );
        }
    };

    match verify_password(&payload.password, &account.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!(login = %account.login, "Login attempt with wrong password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, login = %account.login, "Password verification error");
            return invalid_credentials();
        }
    }

    if !account.is_active {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "account_disabled",
            "This account has been disabled",
        );
    }

    let role: AccountRole = account.role.into();
    let access_token =
        match state
            .jwt_service
            .generate_access_token(account.id, &account.login, role.as_str())
        {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "Failed to generate access token");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An error occurred during login",
                );
            }
        };

    info!(account_id = %account.id, role = %role, "Login succeeded");
    (
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            expires_in: state.jwt_service.access_token_expires_in(),
            role: role.as_str().to_string(),
            login: account.login,
        }),
    )
        .into_response()
}
