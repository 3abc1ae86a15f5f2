//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use super::details::UserSummary;

/// Response returned after a successful registration or login
///
/// Contains the bearer token, its lifetime and the authenticated user's
/// public profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Always "Bearer"
    pub token_type: String,

    /// Access token expiration in seconds
    pub expires_in: i64,

    /// The authenticated user
    pub user: UserSummary,
}

impl LoginResponse {
    /// Creates a new login response
    ///
    /// # Arguments
    ///
    /// * `access_token` - Signed JWT
    /// * `expires_in` - Access token expiration in seconds
    /// * `user` - Public profile of the authenticated user
    pub fn new(access_token: String, expires_in: i64, user: UserSummary) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}
