//! Login account repository.
//!
//! Registration creates the supplier or driver record and its login in a
//! single transaction. The login of a supplier or driver is its register code.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tealeaf_core::registry::RegisterCode;
use tealeaf_shared::AppError;
use tracing::info;
use uuid::Uuid;

use crate::entities::{accounts, drivers, sea_orm_active_enums::AccountRole, suppliers};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Register code or login is already taken.
    #[error("Login already registered: {0}")]
    LoginTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        let message = e.to_string();
        match e {
            AccountError::LoginTaken(_) => Self::Conflict(message),
            AccountError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for registering a supplier.
#[derive(Debug, Clone)]
pub struct RegisterSupplierInput {
    /// Register code, also the login.
    pub code: RegisterCode,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Bank account number.
    pub bank_account_no: Option<String>,
    /// Bank branch.
    pub bank_branch: Option<String>,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
}

/// Input for registering a driver.
#[derive(Debug, Clone)]
pub struct RegisterDriverInput {
    /// Register code, also the login.
    pub code: RegisterCode,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Vehicle registration number.
    pub vehicle_number: Option<String>,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Finds an account by login.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Login.eq(login))
            .one(self.db.as_ref())
            .await
    }

    /// Registers a supplier together with its login.
    pub async fn register_supplier(
        &self,
        input: RegisterSupplierInput,
    ) -> Result<(suppliers::Model, accounts::Model), AccountError> {
        let code = input.code.as_str().to_string();
        self.ensure_login_free(&code).await?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let supplier = suppliers::ActiveModel {
            id: Set(code.clone()),
            name: Set(input.name),
            phone: Set(input.phone),
            address: Set(input.address),
            bank_name: Set(input.bank_name),
            bank_account_no: Set(input.bank_account_no),
            bank_branch: Set(input.bank_branch),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| taken_or_db(e, &code))?;

        let account = insert_account(
            &txn,
            &code,
            input.password_hash,
            AccountRole::Supplier,
            Some(code.clone()),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(supplier_id = %supplier.id, account_id = %account.id, "Supplier registered");
        Ok((supplier, account))
    }

    /// Registers a driver together with its login.
    pub async fn register_driver(
        &self,
        input: RegisterDriverInput,
    ) -> Result<(drivers::Model, accounts::Model), AccountError> {
        let code = input.code.as_str().to_string();
        self.ensure_login_free(&code).await?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let driver = drivers::ActiveModel {
            id: Set(code.clone()),
            name: Set(input.name),
            phone: Set(input.phone),
            vehicle_number: Set(input.vehicle_number),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| taken_or_db(e, &code))?;

        let account = insert_account(
            &txn,
            &code,
            input.password_hash,
            AccountRole::Driver,
            None,
            Some(code.clone()),
        )
        .await?;

        txn.commit().await?;
        info!(driver_id = %driver.id, account_id = %account.id, "Driver registered");
        Ok((driver, account))
    }

    /// Creates an office admin login.
    pub async fn create_admin(
        &self,
        login: &str,
        password_hash: String,
    ) -> Result<accounts::Model, AccountError> {
        self.ensure_login_free(login).await?;

        let txn = self.db.begin().await?;
        let account =
            insert_account(&txn, login, password_hash, AccountRole::Admin, None, None).await?;
        txn.commit().await?;
        info!(account_id = %account.id, login = %account.login, "Admin account created");
        Ok(account)
    }

    async fn ensure_login_free(&self, login: &str) -> Result<(), AccountError> {
        if self.find_by_login(login).await?.is_some() {
            return Err(AccountError::LoginTaken(login.to_string()));
        }
        Ok(())
    }
}

async fn insert_account(
    txn: &DatabaseTransaction,
    login: &str,
    password_hash: String,
    role: AccountRole,
    supplier_id: Option<String>,
    driver_id: Option<String>,
) -> Result<accounts::Model, AccountError> {
    let now = Utc::now().into();
    accounts::ActiveModel {
        id: Set(Uuid::now_v7()),
        login: Set(login.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        supplier_id: Set(supplier_id),
        driver_id: Set(driver_id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(|e| taken_or_db(e, login))
}

/// A unique violation here means a concurrent registration won the race.
fn taken_or_db(e: DbErr, login: &str) -> AccountError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::LoginTaken(login.to_string()),
        _ => AccountError::Database(e),
    }
}
