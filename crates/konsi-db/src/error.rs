//! # Store Error Types
//!
//! Error types for entity-store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Domain Error (LedgerError)        │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  StoreError (this module) ← one type for callers to match on           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Application layer decides how to present each variant                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rule of thumb: `Domain` means the operation was *rejected* with no state
//! change; everything else means the store itself misbehaved.

use thiserror::Error;

use konsi_core::LedgerError;

/// Entity-store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist (possibly hard-deleted)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Optimistic-concurrency conflict: the row's version moved between the
    /// snapshot read and the guarded write.
    ///
    /// ## When This Occurs
    /// - Two ledger operations race on the same product or partner
    /// - The losing writer gets this; retrying re-reads a fresh snapshot
    #[error("{entity} was modified concurrently: {id}")]
    Conflict { entity: String, id: String },

    /// A business rule rejected the operation. No state was changed.
    #[error(transparent)]
    Domain(#[from] LedgerError),

    /// Unique constraint violation.
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
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
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Conflict error for a version-guarded write that matched
    /// zero rows.
    pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_pass_through_transparently() {
        let inner = LedgerError::AlreadyDelivered("d1".to_string());
        let msg = inner.to_string();
        let err: StoreError = inner.into();
        assert_eq!(err.to_string(), msg);
        assert!(matches!(err, StoreError::Domain(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_conflict_message_names_entity_and_id() {
        let err = StoreError::conflict("Product", "p1");
        assert_eq!(err.to_string(), "Product was modified concurrently: p1");
    }
}
