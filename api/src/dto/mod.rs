//! Request bodies with their field-level validation rules

pub mod agreement;
pub mod property;
pub mod user;

pub use agreement::AgreementRequest;
pub use property::PropertyRequest;
pub use user::{LoginRequest, RegisterRequest, UpdateUserRequest};
