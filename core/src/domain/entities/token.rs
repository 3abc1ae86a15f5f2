//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Display name of the user
    pub name: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `full_name` - The user's display name
    /// * `issuer` / `audience` - Values the verifier will insist on
    /// * `lifetime` - How long the token stays valid
    /// * `now` - Issue instant
    ///
    /// # Returns
    ///
    /// A new `Claims` instance for an access token
    pub fn new_access_token(
        user_id: Uuid,
        full_name: &str,
        issuer: &str,
        audience: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            name: full_name.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims are valid at `now` (after nbf, before exp)
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        now >= self.nbf && now < self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims::new_access_token(
            user_id,
            "Ana Souza",
            "rentalhub",
            "rentalhub-api",
            Duration::minutes(60),
            now,
        );

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.name, "Ana Souza");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.is_valid_at(now));
        assert!(!claims.is_valid_at(now + Duration::minutes(61)));
    }

    #[test]
    fn test_each_token_gets_its_own_jti() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let a = Claims::new_access_token(user_id, "A", "i", "a", Duration::minutes(1), now);
        let b = Claims::new_access_token(user_id, "A", "i", "a", Duration::minutes(1), now);
        assert_ne!(a.jti, b.jti);
    }
}
