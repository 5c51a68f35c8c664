//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)       - Business rule violations
//! ├── Marketplace(MarketplaceError) - PARI Corporate call failures
//! ├── Validation(String)        - Input validation failures
//! ├── NotFound                  - Resource not found
//! ├── Unauthorized / Forbidden  - Auth failures
//! ├── Conflict(String)          - Unique constraint violations
//! └── Internal(String)          - Storage and other internal failures
//! ```
//!
//! Repository failures other than not-found and duplicate collapse into
//! `Internal` with a generic message; the underlying detail is logged, not
//! echoed to clients.
//!
//! # Examples
//!
//! ```
//! use pari_backoffice::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("email must not be empty");
//! assert!(err.is_validation());
//!
//! let err = ApplicationError::not_found("Product", "42");
//! assert!(err.is_not_found());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::auth::AuthError;
use crate::infrastructure::marketplace::MarketplaceError;
use crate::infrastructure::persistence::RepositoryError;
use crate::infrastructure::storage::StorageError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Marketplace call failure.
    #[error("marketplace error: {0}")]
    Marketplace(#[from] MarketplaceError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// Authentication failure.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed.
    #[error("forbidden")]
    Forbidden,

    /// Unique constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Domain(_))
    }

    /// Returns true if this is an auth failure.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound {
                resource_type: entity_type.to_string(),
                id,
            },
            RepositoryError::Duplicate { entity_type, .. } => {
                Self::Conflict(format!("{entity_type} already exists"))
            }
            other => {
                tracing::error!(error = %other, "repository failure");
                Self::Internal("storage failure".to_string())
            }
        }
    }
}

impl From<AuthError> for ApplicationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::InvalidCredentials => Self::Unauthorized,
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "auth failure");
                Self::Internal("authentication failure".to_string())
            }
        }
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFileName(name) => {
                Self::Validation(format!("invalid image file name: {name}"))
            }
            StorageError::Io(e) => {
                tracing::error!(error = %e, "image storage failure");
                Self::Internal("image storage failure".to_string())
            }
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
