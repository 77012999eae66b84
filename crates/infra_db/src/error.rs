//! Database error types

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Translates an SQLx error into the port-level error vocabulary
pub fn to_port_error(err: sqlx::Error) -> PortError {
    match err {
        sqlx::Error::RowNotFound => PortError::internal("unexpected missing row"),
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => PortError::Connection {
            message: err.to_string(),
            source: Some(Box::new(err)),
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}
