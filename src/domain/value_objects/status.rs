//! # Status Enums
//!
//! Lifecycle enumerations shared by products and pre-order transactions.
//!
//! [`SubjectStatus`] drives the multi-party verification workflow: subjects
//! start in `Processing` and flip to `Approved` exactly once, when every
//! qualifying user in the owning company has verified them. `Rejected` is
//! reachable only through an explicit update, never through verification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: {value}")]
pub struct ParseEnumError {
    /// Enum type name.
    pub kind: &'static str,
    /// Offending input.
    pub value: String,
}

/// Verification lifecycle status of a product or pre-order transaction.
///
/// # Examples
///
/// ```
/// use pari_backoffice::domain::value_objects::status::SubjectStatus;
///
/// assert_eq!(SubjectStatus::Processing.as_str(), "processing");
/// assert_eq!("approved".parse::<SubjectStatus>().unwrap(), SubjectStatus::Approved);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectStatus {
    /// Awaiting approvals from the company's qualifying users.
    Processing,
    /// Approved by the full quorum.
    Approved,
    /// Explicitly rejected.
    Rejected,
}

impl SubjectStatus {
    /// Returns the canonical lowercase string stored in the database.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if the subject can still collect approvals.
    #[inline]
    #[must_use]
    pub const fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }

    /// Returns true if the subject has passed verification.
    #[inline]
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl Default for SubjectStatus {
    fn default() -> Self {
        Self::Processing
    }
}

impl fmt::Display for SubjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "SubjectStatus",
                value: other.to_string(),
            }),
        }
    }
}

/// KYC-style verification level assigned to a user at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationLevel {
    /// No identity checks performed.
    None,
    /// Basic document checks.
    Basic,
    /// Fully verified corporate user.
    Full,
}

impl VerificationLevel {
    /// Returns the canonical lowercase string stored in the database.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Full => "full",
        }
    }
}

impl Default for VerificationLevel {
    fn default() -> Self {
        Self::None
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            other => Err(ParseEnumError {
                kind: "VerificationLevel",
                value: other.to_string(),
            }),
        }
    }
}
