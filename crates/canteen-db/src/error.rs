//! # Database Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Error Propagation                            │
//! │                                                                  │
//! │  SQLite Error (sqlx::Error)                                      │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  DbError (this module) ← Adds context and categorization         │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  Caller (presentation layer, out of scope) turns it into a       │
//! │  user-facing message; this crate only logs                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expected conditions (not found, duplicate barcode, empty patch) are
//! distinct variants; only genuinely unexpected storage faults end up
//! in the catch-all ones.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in the database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation - in practice, a duplicate barcode
    /// on product insert.
    #[error("duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A product update was requested with no fields supplied.
    ///
    /// Reported distinctly from success: nothing was written, and the
    /// caller probably has a form bug.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// The SQLite build lacks the JSON1 functions the report
    /// aggregation needs (`json_each`, `->>`).
    ///
    /// Surfaced instead of returning an empty report, which would be
    /// indistinguishable from "no sales in range".
    #[error("report engine lacks JSON aggregation support: {0}")]
    StaleReportEngine(String),

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Maps errors from the report aggregation query.
///
/// An old SQLite without JSON1 (or without the `->>` operator, added in
/// 3.38) fails with "no such table: json_each" or a syntax error; both
/// become `StaleReportEngine` so the caller can tell a broken engine
/// apart from an empty report.
pub(crate) fn classify_report_error(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        let msg = db_err.message();
        if msg.contains("json_each") || msg.contains("no such function: json") {
            return DbError::StaleReportEngine(msg.to_string());
        }
    }
    DbError::from(err)
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
