//! # Marketplace Errors
//!
//! Error types for PARI Corporate marketplace calls.
//!
//! # Examples
//!
//! ```
//! use pari_backoffice::infrastructure::marketplace::error::MarketplaceError;
//!
//! let error = MarketplaceError::timeout("request timed out after 10000ms");
//! assert!(error.is_retryable());
//!
//! let error = MarketplaceError::authentication("invalid API key");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for marketplace operations.
#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    /// Request timed out.
    #[error("marketplace timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("marketplace connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure.
    #[error("marketplace authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Invalid request parameters.
    #[error("marketplace invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Response could not be understood.
    #[error("marketplace protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Internal adapter error.
    #[error("marketplace internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl MarketplaceError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if retrying the call may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connection { .. })
    }

    /// Returns true if the failure lies with the request, not the venue.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidRequest { .. }
        )
    }
}

/// Result type for marketplace operations.
pub type MarketplaceResult<T> = Result<T, MarketplaceError>;
