//! Resolution of the acting user from a request credential.

use uuid::Uuid;

use crate::errors::DomainResult;

/// Turns a bearer credential into the acting user's id
///
/// Core operations never read ambient request state; the HTTP layer calls
/// this once per request and passes the id explicitly.
pub trait IdentityResolver: Send + Sync {
    /// Fails `Unauthorized` when the credential is absent or invalid
    fn resolve_acting_user(&self, credential: Option<&str>) -> DomainResult<Uuid>;
}
