//! Token service module for JWT management
//!
//! This module handles JWT access token issuance and verification, and
//! adapts verification into the [`IdentityResolver`](crate::services::IdentityResolver)
//! used by the HTTP layer.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
