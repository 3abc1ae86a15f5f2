//! Shared configuration and common types for the RentalHub server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - Health check response types

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, DatabaseConfig, JwtConfig, LockoutConfig, LogFormat,
    LoggingConfig, ServerConfig, CorsConfig, StorageBackend,
};
pub use errors::{ErrorResponse, IntoErrorResponse, ApiResult, error_codes};
pub use types::{HealthResponse, HealthStatus};
