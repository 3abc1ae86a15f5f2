//! Rendering of failures as HTTP responses

pub mod error;
pub mod validation;

pub use error::{handle_domain_error, status_for, ApiError};
pub use validation::{json_error_handler, validate_request};
