//! Unit tests for token service

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::errors::{AuthError, DomainError, ErrorKind, TokenError};
use crate::services::identity::IdentityResolver;
use crate::services::token::{TokenService, TokenServiceConfig};

fn service() -> TokenService {
    TokenService::new(TokenServiceConfig {
        jwt_secret: "test-secret".to_string(),
        access_token_expiry_minutes: 15,
        ..TokenServiceConfig::default()
    })
}

#[test]
fn test_issue_and_verify_round_trip() {
    let service = service();
    let user_id = Uuid::new_v4();

    let token = service.issue(user_id, "Ana Souza").unwrap();
    let claims = service.verify(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.name, "Ana Souza");
    assert_eq!(claims.iss, "rentalhub");
    assert_eq!(claims.aud, "rentalhub-api");
    assert_eq!(service.expires_in(), 900);
}

#[test]
fn test_expired_token_is_rejected() {
    let service = service();
    let past = Utc::now() - Duration::hours(2);
    let claims = Claims::new_access_token(
        Uuid::new_v4(),
        "Ana",
        "rentalhub",
        "rentalhub-api",
        Duration::minutes(15),
        past,
    );
    let token = service.encode_jwt(&claims).unwrap();

    let err = service.verify(&token).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
}

#[test]
fn test_wrong_audience_is_rejected() {
    let service = service();
    let claims = Claims::new_access_token(
        Uuid::new_v4(),
        "Ana",
        "rentalhub",
        "someone-else",
        Duration::minutes(15),
        Utc::now(),
    );
    let token = service.encode_jwt(&claims).unwrap();

    let err = service.verify(&token).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidClaims)));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let other = TokenService::new(TokenServiceConfig {
        jwt_secret: "other-secret".to_string(),
        ..TokenServiceConfig::default()
    });
    let token = other.issue(Uuid::new_v4(), "Ana").unwrap();

    assert!(service().verify(&token).is_err());
}

#[test]
fn test_resolver_returns_subject() {
    let service = service();
    let user_id = Uuid::new_v4();
    let token = service.issue(user_id, "Ana").unwrap();

    assert_eq!(service.resolve_acting_user(Some(token.as_str())).unwrap(), user_id);
}

#[test]
fn test_resolver_rejects_missing_and_garbage_credentials() {
    let service = service();

    for credential in [None, Some(""), Some("not-a-jwt")] {
        let err = service.resolve_acting_user(credential).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(matches!(err, DomainError::Auth(AuthError::MissingCredential)));
        assert_eq!(err.to_string(), "Log in to use this resource.");
    }
}
