//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod details;

// Re-export commonly used types
pub use auth_response::LoginResponse;
pub use details::{AgreementDetails, PropertyDetails, UserSummary};
