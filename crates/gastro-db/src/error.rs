//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized: NotFound / Conflict / ...        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/api) ← { code, message } + HTTP status                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend shows the message                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gastro_core::{CoreError, ValidationError};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Id doesn't exist on get/update/delete
    /// - A batch references an unknown id (whole batch rolls back)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A constraint blocks the write.
    ///
    /// ## When This Occurs
    /// - Deleting an ingredient still linked to a product
    /// - Deleting a product referenced by a sale
    /// - Referencing a product id that doesn't exist
    /// - Any UNIQUE index violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before touching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business rule rejected the operation (e.g. status going backward).
    #[error(transparent)]
    Rule(CoreError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => DbError::Validation(v),
            other => DbError::Rule(other),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → FOREIGN KEY / UNIQUE → Conflict, else QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "FOREIGN KEY constraint failed"
                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::Conflict(
                        "the record is referenced by, or references, another record".to_string(),
                    )
                } else if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
                    DbError::Conflict(format!("duplicate value for {}", field))
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use gastro_core::SaleStatus;

    #[test]
    fn test_core_validation_unwraps_to_validation() {
        let err: DbError = CoreError::Validation(ValidationError::required("products")).into();
        assert!(matches!(err, DbError::Validation(_)));

        let err: DbError = CoreError::InvalidStatusTransition {
            sale_id: "s".to_string(),
            from: SaleStatus::Paid,
            to: SaleStatus::InProgress,
        }
        .into();
        assert!(matches!(err, DbError::Rule(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
