//! Domain error to HTTP response mapping
//!
//! Every failure leaves the API as the shared [`ErrorResponse`] body with a
//! status derived from the error's [`ErrorKind`].

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use rh_core::errors::{AuthError, DomainError, ErrorKind};
use rh_shared::errors::{error_codes, ErrorResponse};

const INTERNAL_MESSAGE: &str = "An internal error occurred.";

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Locked => StatusCode::LOCKED,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => error_codes::NOT_FOUND,
        ErrorKind::BadRequest => error_codes::BAD_REQUEST,
        ErrorKind::Unauthorized => error_codes::UNAUTHORIZED,
        ErrorKind::Forbidden => error_codes::FORBIDDEN,
        ErrorKind::Conflict => error_codes::CONFLICT,
        ErrorKind::Locked => error_codes::LOCKED,
        ErrorKind::Internal => error_codes::INTERNAL_ERROR,
    }
}

/// Build the error body for a domain error
pub fn error_response(error: &DomainError) -> ErrorResponse {
    let kind = error.kind();

    match error {
        DomainError::ValidationErr(err) => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string())
                .add_detail(err.field(), vec![err.to_string()])
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
        }
        DomainError::Token(err) => {
            tracing::debug!(error = %err, "Access token rejected");
            ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                AuthError::MissingCredential.to_string(),
            )
        }
        DomainError::Auth(AuthError::AccountLocked { until }) => {
            ErrorResponse::new(error_codes::LOCKED, error.to_string()).add_detail("locked_until", until)
        }
        _ if kind == ErrorKind::Internal => {
            tracing::error!(error = %error, "Request failed with an internal error");
            ErrorResponse::new(error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE)
        }
        _ => ErrorResponse::new(code_for(kind), error.to_string()),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    HttpResponse::build(status_for(error.kind())).json(error_response(error))
}

/// Domain error carried through actix-web's error channel
///
/// Used where a handler cannot return a response directly: middleware and
/// extractors.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.kind())
    }

    fn error_response(&self) -> HttpResponse {
        handle_domain_error(&self.0)
    }
}
