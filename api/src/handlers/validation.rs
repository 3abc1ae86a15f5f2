//! Request body validation

use std::collections::HashMap;

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use validator::{Validate, ValidationErrors};

use rh_shared::errors::{error_codes, ErrorResponse};

/// Run the `validator` rules of a request body
///
/// Returns a ready `400` response listing the messages per field.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), HttpResponse> {
    request
        .validate()
        .map_err(|errors| HttpResponse::BadRequest().json(validation_response(&errors)))
}

fn validation_response(errors: &ValidationErrors) -> ErrorResponse {
    let details: HashMap<String, serde_json::Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => describe(field, &error.code),
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect();

    ErrorResponse::with_details(error_codes::VALIDATION_ERROR, "Invalid request data.", details)
}

fn describe(field: &str, code: &str) -> String {
    match code {
        "email" => format!("{} must be a valid e-mail address.", field),
        "length" => format!("{} has an invalid length.", field),
        "range" => format!("{} is out of range.", field),
        _ => format!("{} is invalid.", field),
    }
}

/// Render malformed JSON bodies as the shared error body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(error_codes::BAD_REQUEST, message));
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::RegisterRequest;

    #[test]
    fn test_register_rules() {
        let request = RegisterRequest {
            full_name: String::new(),
            email: "not-an-email".into(),
            phone: "555".into(),
            password: "abc".into(),
        };

        let errors = request.validate().unwrap_err();
        let body = validation_response(&errors);
        let details = body.details.unwrap();

        assert!(details.contains_key("full_name"));
        assert!(details.contains_key("email"));
        assert!(details.contains_key("password"));
        assert!(!details.contains_key("phone"));
    }
}
