//! Driver repository.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use tealeaf_shared::AppError;

use crate::entities::drivers;

/// Error types for driver operations.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Driver not found.
    #[error("Driver not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DriverError> for AppError {
    fn from(e: DriverError) -> Self {
        let message = e.to_string();
        match e {
            DriverError::NotFound(_) => Self::NotFound(message),
            DriverError::Database(_) => Self::Database(message),
        }
    }
}

/// Driver repository.
#[derive(Debug, Clone)]
pub struct DriverRepository {
    db: Arc<DatabaseConnection>,
}

impl DriverRepository {
    /// Creates a new driver repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Finds a driver by register code.
    pub async fn find_by_id(&self, id: &str) -> Result<drivers::Model, DriverError> {
        drivers::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| DriverError::NotFound(id.to_string()))
    }

    /// Lists drivers ordered by register code.
    pub async fn list(&self) -> Result<Vec<drivers::Model>, DbErr> {
        drivers::Entity::find()
            .order_by_asc(drivers::Column::Id)
            .all(self.db.as_ref())
            .await
    }
}
