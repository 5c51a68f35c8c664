//! Session tokens for back-office users.
//!
//! HS256 with a configured secret, three-hour expiry. The token carries a
//! trimmed user payload so handlers can authorize without a user lookup;
//! the password hash never enters the claims.

use crate::domain::entities::User;
use crate::domain::value_objects::{CompanyId, RoleId, UserId, VerificationLevel};
use crate::infrastructure::auth::{AuthError, AuthResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_HOURS: i64 = 3;

/// User payload embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUser {
    /// User id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role held by the user.
    pub role_id: RoleId,
    /// Role name, when the login read joined it.
    pub role_name: Option<String>,
    /// Owning company.
    pub company_id: CompanyId,
    /// KYC verification level.
    pub verification_level: VerificationLevel,
}

impl From<&User> for TokenUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role_id: user.role_id,
            role_name: user.role_name.clone(),
            company_id: user.company_id,
            verification_level: user.verification_level,
        }
    }
}

/// JWT claims for a user session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: i64,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Embedded user payload.
    pub user: TokenUser,
}

/// Encoder/decoder for user session tokens.
#[derive(Clone)]
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec").finish_non_exhaustive()
    }
}

impl JwtCodec {
    /// Creates a codec from the configured signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a session token for the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` if signing fails.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let claims = Claims {
            sub: user.id.value(),
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            user: TokenUser::from(user),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Decodes and validates a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` when the token is malformed,
    /// expired, or signed with a different secret.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::new(7),
            name: "Ayu".to_string(),
            email: "ayu@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            verification_level: VerificationLevel::Basic,
            role_id: RoleId::new(2),
            role_name: Some("verificator".to_string()),
            company_id: CompanyId::new(3),
            company_name: None,
            must_change_password: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let codec = JwtCodec::new("unit-test-secret");
        let token = codec.issue(&sample_user()).unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.user.email, "ayu@example.com");
        assert_eq!(claims.user.role_name.as_deref(), Some("verificator"));
    }

    #[test]
    fn token_never_carries_password_hash() {
        let codec = JwtCodec::new("unit-test-secret");
        let token = codec.issue(&sample_user()).unwrap();
        assert!(!token.contains("argon2id"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let codec = JwtCodec::new("unit-test-secret");
        let token = codec.issue(&sample_user()).unwrap();

        let other = JwtCodec::new("different-secret");
        assert!(other.verify(&token).is_err());
    }
}
