//! Router tests driven through `tower::ServiceExt::oneshot` against a mock
//! Postgres connection.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use tealeaf_api::{AppState, LocationHub, create_router};
use tealeaf_core::settlement::SettlementPolicy;
use tealeaf_db::entities::{
    accounts, advances, leaf_collections, loans, payments, product_orders,
    sea_orm_active_enums::{AdvanceStatus, LoanStatus, SettlementStatus},
    suppliers,
};
use tealeaf_shared::{JwtConfig, JwtService};

const SECRET: &str = "router-test-secret";

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_minutes: 15,
    })
}

fn app_with(db: impl Into<Arc<DatabaseConnection>>) -> Router {
    create_router(AppState {
        db: db.into(),
        jwt_service: Arc::new(jwt()),
        settlement_policy: SettlementPolicy::default(),
        expose_error_details: true,
        locations: LocationHub::new(),
    })
}

fn app() -> Router {
    app_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

fn token(login: &str, role: &str) -> String {
    jwt()
        .generate_access_token(Uuid::now_v7(), login, role)
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn amount(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn supplier_row(id: &str) -> suppliers::Model {
    let now = Utc::now().into();
    suppliers::Model {
        id: id.to_string(),
        name: "Nimal Perera".to_string(),
        phone: None,
        address: None,
        bank_name: None,
        bank_account_no: None,
        bank_branch: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let response = app().oneshot(get("/api/v1/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "tealeaf");
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let response = app()
        .oneshot(get("/api/v1/suppliers/SUP-001/loans", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let response = app()
        .oneshot(get("/api/v1/products", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_token");
}

#[tokio::test]
async fn test_supplier_cannot_read_another_suppliers_loans() {
    let token = token("SUP-001", "supplier");

    let response = app()
        .oneshot(get("/api/v1/suppliers/SUP-002/loans", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "forbidden");
}

#[tokio::test]
async fn test_supplier_cannot_record_a_completed_sale() {
    let token = token("SUP-001", "supplier");
    let body = json!({
        "supplier_id": "SUP-001",
        "product_id": Uuid::now_v7(),
        "quantity": 2,
        "status": "completed"
    });

    let response = app()
        .oneshot(send_json("POST", "/api/v1/orders", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_with_unknown_account_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<accounts::Model>::new()])
        .into_connection();
    let body = json!({ "login": "SUP-404", "password": "whatever-123" });

    let response = app_with(db)
        .oneshot(send_json("POST", "/api/v1/auth/login", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_credentials");
}

/// Supplier S1: one delivery worth 1000, a pending loan of 300 and a
/// transferred advance.
fn s1_records() -> MockDatabase {
    let now = Utc::now();
    let today = now.date_naive();
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![supplier_row("S1")]])
        .append_query_results([vec![leaf_collections::Model {
            id: Uuid::now_v7(),
            supplier_id: "S1".to_string(),
            driver_id: None,
            rate_at_collection: dec!(50),
            gross_weight_kg: dec!(20),
            water_weight_kg: Decimal::ZERO,
            bag_weight_kg: Decimal::ZERO,
            net_weight_kg: dec!(20),
            collected_at: now.into(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results([vec![loans::Model {
            id: Uuid::now_v7(),
            supplier_id: "S1".to_string(),
            principal_amount: dec!(300),
            duration_months: 0,
            purpose: "Seedlings".to_string(),
            monthly_installment: dec!(300),
            issued_on: today,
            due_date: today,
            status: LoanStatus::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results([vec![advances::Model {
            id: Uuid::now_v7(),
            supplier_id: "S1".to_string(),
            amount: dec!(200),
            advance_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: AdvanceStatus::Transferred,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .append_query_results([Vec::<product_orders::Model>::new()])
}

#[tokio::test]
async fn test_settlement_preview_uses_client_field_names() {
    let db = s1_records().into_connection();
    let token = token("admin", "admin");

    let response = app_with(db)
        .oneshot(get(
            "/api/v1/settlements/preview?supplierId=S1",
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(amount(&body["GrossIncome"]), dec!(1000));
    assert_eq!(amount(&body["LoanAmount"]), dec!(300));
    assert_eq!(amount(&body["AdvanceAmount"]), Decimal::ZERO);
    assert_eq!(amount(&body["ProductsAmount"]), Decimal::ZERO);
    assert_eq!(amount(&body["TransportCharge"]), dec!(100));
    assert_eq!(amount(&body["FinalTotal"]), dec!(600));
}

#[tokio::test]
async fn test_create_settlement_applies_top_level_overrides() {
    let now = Utc::now();
    let stored = payments::Model {
        id: Uuid::now_v7(),
        supplier_id: "S1".to_string(),
        gross_income: dec!(1000),
        loan_amount: Decimal::ZERO,
        advance_amount: Decimal::ZERO,
        products_amount: Decimal::ZERO,
        transport_charge: Decimal::ZERO,
        final_total: dec!(1000),
        payment_date: now.date_naive(),
        status: SettlementStatus::Pending,
        idempotency_key: None,
        archived_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    };
    let db = Arc::new(
        s1_records()
            .append_query_results([vec![stored]])
            .into_connection(),
    );
    let token = token("admin", "admin");
    let body = json!({ "supplierId": "S1", "loan_amount": "0", "transport_charge": "0" });

    let response = app_with(Arc::clone(&db))
        .oneshot(send_json("POST", "/api/v1/settlements", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "pending");
    assert_eq!(amount(&created["final_total"]), dec!(1000));

    // The insert carries the overridden amounts, not the computed 300 and 600.
    let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
    let insert = &log[5].statements()[0];
    assert!(insert.sql.starts_with(r#"INSERT INTO "payments""#), "{}", insert.sql);
    let values = &insert.values.as_ref().unwrap().0;
    let decimal = |d: Decimal| sea_orm::Value::Decimal(Some(Box::new(d)));
    assert!(values.contains(&decimal(dec!(1000))));
    assert!(!values.contains(&decimal(dec!(300))));
    assert!(!values.contains(&decimal(dec!(600))));
}

#[tokio::test]
async fn test_unknown_settlement_status_is_bad_request() {
    let token = token("admin", "admin");
    let uri = format!("/api/v1/settlements/{}/status", Uuid::now_v7());

    let response = app()
        .oneshot(send_json(
            "PUT",
            &uri,
            Some(&token),
            &json!({ "status": "refunded" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_status");
}

#[tokio::test]
async fn test_driver_location_round_trip() {
    let app = app();
    let driver = token("DRV-01", "driver");
    let fix = json!({ "latitude": 6.9497, "longitude": 80.7891, "heading": 90.0 });

    let published = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/v1/drivers/DRV-01/location",
            Some(&driver),
            &fix,
        ))
        .await
        .unwrap();
    assert_eq!(published.status(), StatusCode::ACCEPTED);

    let supplier = token("SUP-001", "supplier");
    let latest = app
        .oneshot(get("/api/v1/drivers/DRV-01/location", Some(&supplier)))
        .await
        .unwrap();

    assert_eq!(latest.status(), StatusCode::OK);
    let body = body_json(latest).await;
    assert_eq!(body["driver_id"], "DRV-01");
    assert_eq!(body["latitude"], 6.9497);
}

#[tokio::test]
async fn test_driver_cannot_publish_for_another_driver() {
    let driver = token("DRV-01", "driver");
    let fix = json!({ "latitude": 6.9, "longitude": 80.7 });

    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/v1/drivers/DRV-02/location",
            Some(&driver),
            &fix,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_out_of_range_fix_is_rejected() {
    let driver = token("DRV-01", "driver");
    let fix = json!({ "latitude": 91.0, "longitude": 80.7 });

    let response = app()
        .oneshot(send_json(
            "POST",
            "/api/v1/drivers/DRV-01/location",
            Some(&driver),
            &fix,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_location_is_not_found() {
    let admin = token("admin", "admin");

    let response = app()
        .oneshot(get("/api/v1/drivers/DRV-09/location", Some(&admin)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
