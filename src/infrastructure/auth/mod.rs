//! # Authentication
//!
//! JWT session tokens for back-office users, argon2 password hashing, and
//! short-lived signed service keys for marketplace callers.

pub mod jwt;
pub mod password;
pub mod service_key;

pub use jwt::{Claims, JwtCodec, TokenUser};
pub use password::PasswordHasher;
pub use service_key::{IssuedKey, ServiceKeyIssuer};

use thiserror::Error;

/// Error type for authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token is missing, malformed, expired, or carries a bad signature.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Credentials did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Hashing or signing failed.
    #[error("auth internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
