//! bcrypt helpers

use crate::errors::{AuthError, DomainResult};

pub(crate) fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(password, cost).map_err(|e| {
        AuthError::HashingFailed { message: e.to_string() }.into()
    })
}

/// A malformed stored hash counts as a mismatch
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("s3cret", "not-a-bcrypt-hash"));
    }
}
