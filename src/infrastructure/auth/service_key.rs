//! Service keys for marketplace callers.
//!
//! Open endpoints authenticate with a short-lived signed key instead of a
//! user session. A caller presents its configured client id and secret to
//! the token endpoint and receives an HS256-signed key valid for fifteen
//! minutes. Keys are stateless and cannot be revoked before expiry.

use crate::infrastructure::auth::{AuthError, AuthResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const KEY_TTL_MINUTES: i64 = 15;

/// Claims carried by a service key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServiceClaims {
    /// The authenticated client id.
    sub: String,
    /// Expiry as a unix timestamp.
    exp: i64,
}

/// A freshly issued service key with its expiry.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedKey {
    /// The signed key.
    pub key: String,
    /// When the key stops being accepted.
    pub expired_at: DateTime<Utc>,
}

/// Issues and validates service keys against the configured client table.
#[derive(Clone)]
pub struct ServiceKeyIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    clients: HashMap<String, String>,
}

impl std::fmt::Debug for ServiceKeyIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKeyIssuer")
            .field("clients", &self.clients.len())
            .finish_non_exhaustive()
    }
}

impl ServiceKeyIssuer {
    /// Creates an issuer from the signing secret and the client/secret table.
    #[must_use]
    pub fn new(secret: &str, clients: HashMap<String, String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            clients,
        }
    }

    /// Issues a key for a configured client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the client id is unknown
    /// or the secret does not match.
    pub fn issue(&self, client_id: &str, client_secret: &str) -> AuthResult<IssuedKey> {
        let expected = self
            .clients
            .get(client_id)
            .ok_or(AuthError::InvalidCredentials)?;
        if expected != client_secret {
            return Err(AuthError::InvalidCredentials);
        }

        let expired_at = Utc::now() + Duration::minutes(KEY_TTL_MINUTES);
        let claims = ServiceClaims {
            sub: client_id.to_string(),
            exp: expired_at.timestamp(),
        };
        let key = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(IssuedKey { key, expired_at })
    }

    /// Validates a presented key and returns the client id it was issued to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` when the key is malformed, expired,
    /// or signed with a different secret.
    pub fn validate(&self, key: &str) -> AuthResult<String> {
        decode::<ServiceClaims>(key, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
