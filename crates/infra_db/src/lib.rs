//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL adapters for the tutoring billing
//! system using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: each repository implements a
//! domain port, hiding the database details from the domain layer.
//!
//! - `CatalogRepository` implements `domain_catalog::CatalogPort`
//! - `MileLedgerRepository` implements `domain_billing::MileLedgerPort`
//! - `OrderRepository` implements `domain_billing::OrderWriter`, writing a
//!   confirmed order as one transaction with a compare-and-decrement
//!   ledger debit
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, CatalogRepository};
//!
//! let pool = create_pool("postgres://localhost/tutoring").await?;
//! let catalog = CatalogRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use repositories::{CatalogRepository, MileLedgerRepository, OrderRepository};

/// Applies pending migrations from the crate's migrations directory
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
