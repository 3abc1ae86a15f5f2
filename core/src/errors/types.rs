//! Error type definitions for authentication, token handling and
//! input validation, plus the error taxonomy shared by every service.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error taxonomy every failure collapses into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity does not exist
    NotFound,
    /// Input rejected past field-level validation
    BadRequest,
    /// Missing credential or missing relationship to the resource
    Unauthorized,
    /// Authenticated but not entitled to the resource
    Forbidden,
    /// A uniqueness invariant would be violated
    Conflict,
    /// Account temporarily locked
    Locked,
    /// Failure not attributable to caller input
    Internal,
}

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Account locked until {until}.")]
    AccountLocked { until: DateTime<Utc> },

    #[error("Log in to use this resource.")]
    MissingCredential,

    #[error("Password hashing failed: {message}")]
    HashingFailed { message: String },
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::MissingCredential => ErrorKind::Unauthorized,
            AuthError::AccountLocked { .. } => ErrorKind::Locked,
            AuthError::HashingFailed { .. } => ErrorKind::Internal,
        }
    }
}

/// Token-related errors
///
/// All of them surface to callers as "Log in to use this resource."; the
/// variant is kept for logs.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors for values checked outside the request DTOs
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} must be greater than zero.")]
    NotPositive { field: String },

    #[error("{field} must be a date after today.")]
    NotInFuture { field: String },

    #[error("{field} must be between {min} and {max} characters.")]
    InvalidLength { field: String, min: usize, max: usize },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            ValidationError::NotPositive { field }
            | ValidationError::NotInFuture { field }
            | ValidationError::InvalidLength { field, .. } => field,
        }
    }
}
