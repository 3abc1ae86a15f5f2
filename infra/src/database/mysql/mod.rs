//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations. Identifiers are stored as
//! `CHAR(36)` strings.

mod agreement_repository_impl;
mod property_repository_impl;
mod rows;
mod user_repository_impl;

// Re-export the MySQL implementations
pub use agreement_repository_impl::MySqlAgreementRepository;
pub use property_repository_impl::MySqlPropertyRepository;
pub use user_repository_impl::MySqlUserRepository;
