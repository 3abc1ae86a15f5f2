//! Main token service implementation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::services::identity::IdentityResolver;

use super::config::TokenServiceConfig;

/// Service issuing and verifying HS256 access tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }

    /// Issues an access token for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID, stored as `sub`
    /// * `full_name` - The user's display name, stored as `name`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The signed JWT
    /// * `Err(DomainError)` - Token generation failed
    pub fn issue(&self, user_id: Uuid, full_name: &str) -> DomainResult<String> {
        let claims = Claims::new_access_token(
            user_id,
            full_name,
            &self.config.issuer,
            &self.config.audience,
            Duration::minutes(self.config.access_token_expiry_minutes),
            Utc::now(),
        );
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Arguments
    ///
    /// * `token` - The JWT access token to verify
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is invalid, expired, or malformed
    pub fn verify(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => DomainError::Token(TokenError::TokenExpired),
                    ErrorKind::ImmatureSignature => DomainError::Token(TokenError::TokenNotYetValid),
                    ErrorKind::InvalidSignature => DomainError::Token(TokenError::InvalidSignature),
                    ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                        DomainError::Token(TokenError::InvalidClaims)
                    }
                    _ => DomainError::Token(TokenError::InvalidTokenFormat),
                }
            })?;

        Ok(token_data.claims)
    }
}

impl IdentityResolver for TokenService {
    fn resolve_acting_user(&self, credential: Option<&str>) -> DomainResult<Uuid> {
        let token = credential
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingCredential)?;

        let claims = self.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            DomainError::Auth(AuthError::MissingCredential)
        })?;

        claims.user_id().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Access token subject is not a UUID");
            DomainError::Auth(AuthError::MissingCredential)
        })
    }
}
