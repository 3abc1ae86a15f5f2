//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management
//! - Repository implementations with explicit JOINs for materialized reads
//! - Transactions for agreement writes that move a property's occupant
//! - Embedded schema migrations

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlAgreementRepository, MySqlPropertyRepository, MySqlUserRepository};
