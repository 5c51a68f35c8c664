//! # Domain Errors
//!
//! Business-rule violations raised by the domain layer.

use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required field was empty or missing.
    #[error("empty required field: {0}")]
    EmptyField(&'static str),

    /// A quantity adjustment would drive stock negative.
    #[error("insufficient stock: have {available}, requested {requested}")]
    InsufficientStock {
        /// Stock on hand.
        available: i32,
        /// Quantity requested.
        requested: i32,
    },

    /// A value failed enum parsing.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending input.
        value: String,
    },
}

impl DomainError {
    /// Creates an empty-field error.
    #[must_use]
    pub const fn empty_field(field: &'static str) -> Self {
        Self::EmptyField(field)
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}
