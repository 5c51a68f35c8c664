//! # Configuration
//!
//! Environment-driven settings, loaded once at startup. A `.env` file is
//! honored when present (see [`Settings::from_env`]); real environment
//! variables win over it.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `PORT` | HTTP listen port | `8080` |
//! | `DATABASE_URL` | Postgres connection string | required |
//! | `ALLOW_ORIGIN` | CORS allow-origin | `http://localhost:3003` |
//! | `JWT_SECRET` | Session token signing secret | required |
//! | `SERVICE_KEY_SECRET` | Service key signing secret | required |
//! | `SERVICE_CLIENTS` | `id:secret` pairs, comma separated | empty |
//! | `PARI_BASE_URL` | Marketplace base URL | required |
//! | `PARI_API_KEY` | Marketplace API key | required |
//! | `UPLOAD_DIR` | Image upload directory | `upload` |
//! | `PARI_TIMEOUT_MS` | Marketplace HTTP timeout | `10000` |

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but unparseable.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port.
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// CORS allow-origin for the back-office frontend.
    pub allow_origin: String,
    /// Session token signing secret.
    pub jwt_secret: String,
    /// Service key signing secret.
    pub service_key_secret: String,
    /// Configured marketplace clients, id to secret.
    pub service_clients: HashMap<String, String>,
    /// Marketplace base URL.
    pub pari_base_url: String,
    /// Marketplace API key.
    pub pari_api_key: String,
    /// Directory for uploaded product images.
    pub upload_dir: PathBuf,
    /// Marketplace HTTP timeout in milliseconds.
    pub pari_timeout_ms: u64,
}

impl Settings {
    /// Loads settings from the environment, reading `.env` first when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: parsed("PORT", 8080)?,
            database_url: required("DATABASE_URL")?,
            allow_origin: optional("ALLOW_ORIGIN", "http://localhost:3003"),
            jwt_secret: required("JWT_SECRET")?,
            service_key_secret: required("SERVICE_KEY_SECRET")?,
            service_clients: parse_clients(&optional("SERVICE_CLIENTS", "")),
            pari_base_url: required("PARI_BASE_URL")?,
            pari_api_key: required("PARI_API_KEY")?,
            upload_dir: PathBuf::from(optional("UPLOAD_DIR", "upload")),
            pari_timeout_ms: parsed("PARI_TIMEOUT_MS", 10_000)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Parses `id:secret,id:secret` pairs; malformed entries are skipped.
fn parse_clients(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|entry| {
            let (id, secret) = entry.split_once(':')?;
            let id = id.trim();
            let secret = secret.trim();
            if id.is_empty() || secret.is_empty() {
                None
            } else {
                Some((id.to_string(), secret.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn client_table_parses_pairs() {
        let clients = parse_clients("marketplace:abc, partner : xyz ,broken,also:");
        assert_eq!(clients.len(), 2);
        assert_eq!(clients["marketplace"], "abc");
        assert_eq!(clients["partner"], "xyz");
    }

    #[test]
    fn empty_client_table_is_empty() {
        assert!(parse_clients("").is_empty());
    }
}
