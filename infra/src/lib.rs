//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the RentalHub
//! application. It provides concrete implementations of the repository
//! traits declared in `rh_core`.
//!
//! ## Architecture
//!
//! - **Database**: MySQL implementations using SQLx, the connection pool and
//!   the embedded schema migrations
//! - **Memory**: a process-local store with the same keys, cascades and
//!   all-or-nothing writes, used for development and HTTP tests
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use rh_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory repositories
pub mod memory;

pub use memory::InMemoryStore;

#[cfg(feature = "mysql")]
use rh_shared::config::DatabaseConfig;

/// Connect to MySQL and bring the schema up to date
///
/// Migrations run only when `run_migrations` is set in the configuration.
#[cfg(feature = "mysql")]
pub async fn initialize(config: DatabaseConfig) -> Result<database::DatabasePool, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let run_migrations = config.run_migrations;
    let pool = database::DatabasePool::new(config).await?;
    if run_migrations {
        pool.run_migrations().await?;
    }

    tracing::info!("Infrastructure services initialized successfully");
    Ok(pool)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
