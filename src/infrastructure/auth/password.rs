//! Argon2 password hashing.

use crate::infrastructure::auth::{AuthError, AuthResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};

/// Argon2id hasher with the library defaults.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if hashing fails.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch and
    /// `AuthError::Internal` when the stored hash cannot be parsed.
    pub fn verify(&self, password: &str, stored_hash: &str) -> AuthResult<()> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| AuthError::Internal(e.to_string()))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("s3cret-password").unwrap();

        assert!(hash.starts_with("$argon2"));
        hasher.verify("s3cret-password", &hash).unwrap();
    }

    #[test]
    fn wrong_password_fails() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("s3cret-password").unwrap();

        let err = hasher.verify("other-password", &hash).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b);
    }
}
