//! Leaf collection and deduction repository tests against a mock Postgres connection.

mod common;

use common::{SUPPLIER, advance, collection, loan, supplier};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use tealeaf_core::collection::{CollectionError, LeafWeighing};
use tealeaf_core::deduction::{DeductionError, LoanStatus, LoanTerms};
use tealeaf_db::entities::{
    accounts, leaf_collections, sea_orm_active_enums::AdvanceStatus, suppliers,
};
use tealeaf_db::repositories::{
    AccountError, AccountRepository, AdvanceError, AdvanceRepository, CollectionRepository,
    CreateLoanInput, LeafCollectionError, LoanError, LoanRepository, RecordCollectionInput,
};

fn weighing(gross: rust_decimal::Decimal) -> LeafWeighing {
    LeafWeighing {
        gross_weight_kg: gross,
        water_weight_kg: dec!(3),
        bag_weight_kg: dec!(2),
        rate_at_collection: dec!(50),
    }
}

#[tokio::test]
async fn test_record_rejects_weighing_before_querying() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = CollectionRepository::new(db)
        .record(RecordCollectionInput {
            supplier_id: SUPPLIER.to_string(),
            driver_id: None,
            weighing: weighing(dec!(4)),
            collected_at: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LeafCollectionError::Invalid(_)));
}

#[tokio::test]
async fn test_record_for_unknown_supplier_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<suppliers::Model>::new()])
        .into_connection();

    let err = CollectionRepository::new(db)
        .record(RecordCollectionInput {
            supplier_id: "SUP-404".to_string(),
            driver_id: Some("DRV-01".to_string()),
            weighing: weighing(dec!(25)),
            collected_at: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LeafCollectionError::SupplierNotFound(ref id) if id == "SUP-404"));
}

#[tokio::test]
async fn test_record_stores_derived_net_weight() {
    let stored = collection(dec!(20), dec!(50));
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![supplier()]])
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let recorded = CollectionRepository::new(db)
        .record(RecordCollectionInput {
            supplier_id: SUPPLIER.to_string(),
            driver_id: None,
            weighing: weighing(dec!(25)),
            collected_at: None,
        })
        .await
        .expect("record");

    assert_eq!(recorded.net_weight_kg, dec!(20));
}

#[tokio::test]
async fn test_summary_totals_every_delivery() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![supplier()]])
        .append_query_results([vec![
            collection(dec!(20), dec!(50)),
            collection(dec!(12.5), dec!(48)),
        ]])
        .into_connection();

    let summary = CollectionRepository::new(db)
        .summary_for_supplier(SUPPLIER)
        .await
        .expect("summary");

    assert_eq!(summary.deliveries, 2);
    assert_eq!(summary.total_net_weight_kg, dec!(32.5));
    assert_eq!(summary.gross_income, dec!(1600));
}

#[tokio::test]
async fn test_summary_without_deliveries_is_zero() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![supplier()]])
        .append_query_results([Vec::<leaf_collections::Model>::new()])
        .into_connection();

    let summary = CollectionRepository::new(db)
        .summary_for_supplier(SUPPLIER)
        .await
        .expect("summary");

    assert_eq!(summary.deliveries, 0);
    assert_eq!(summary.gross_income, dec!(0));
}

#[tokio::test]
async fn test_delete_missing_collection_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let err = CollectionRepository::new(db)
        .delete(uuid::Uuid::now_v7())
        .await
        .unwrap_err();

    assert!(matches!(err, LeafCollectionError::NotFound(_)));
}

#[tokio::test]
async fn test_loan_lines_keep_every_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            loan(dec!(600), tealeaf_db::entities::sea_orm_active_enums::LoanStatus::Pending),
            loan(
                dec!(300),
                tealeaf_db::entities::sea_orm_active_enums::LoanStatus::Successful,
            ),
        ]])
        .into_connection();

    let lines = LoanRepository::new(db)
        .lines_for_supplier(SUPPLIER)
        .await
        .expect("lines");

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].status, LoanStatus::Pending);
    assert_eq!(lines[1].status, LoanStatus::Successful);
}

#[tokio::test]
async fn test_loan_with_negative_duration_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = LoanRepository::new(db)
        .create(CreateLoanInput {
            supplier_id: SUPPLIER.to_string(),
            terms: LoanTerms {
                principal_amount: dec!(1000),
                duration_months: -1,
            },
            purpose: "Roof repair".to_string(),
            issued_on: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LoanError::Invalid(DeductionError::NegativeDuration)));
}

#[tokio::test]
async fn test_advance_with_zero_amount_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let err = AdvanceRepository::new(db)
        .create(SUPPLIER, dec!(0), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AdvanceError::Invalid(_)));
}

#[tokio::test]
async fn test_advance_lines_map_status() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            advance(dec!(500), AdvanceStatus::Pending),
            advance(dec!(200), AdvanceStatus::Transferred),
        ]])
        .into_connection();

    let lines = AdvanceRepository::new(db)
        .lines_for_supplier(SUPPLIER)
        .await
        .expect("lines");

    assert!(lines[0].status.is_outstanding());
    assert!(!lines[1].status.is_outstanding());
}

#[tokio::test]
async fn test_register_with_taken_login_is_conflict() {
    let existing = accounts::Model {
        id: uuid::Uuid::now_v7(),
        login: SUPPLIER.to_string(),
        password_hash: "$argon2id$test".to_string(),
        role: tealeaf_db::entities::sea_orm_active_enums::AccountRole::Supplier,
        supplier_id: Some(SUPPLIER.to_string()),
        driver_id: None,
        is_active: true,
        created_at: chrono::Utc::now().into(),
        updated_at: chrono::Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .into_connection();

    let err = AccountRepository::new(db)
        .create_admin(SUPPLIER, "$argon2id$other".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AccountError::LoginTaken(ref login) if login == SUPPLIER));
}

#[test]
fn test_weighing_error_is_reported_as_validation() {
    let err: tealeaf_shared::AppError =
        LeafCollectionError::Invalid(CollectionError::EmptyDelivery).into();
    assert_eq!(err.status_code(), 400);
}
