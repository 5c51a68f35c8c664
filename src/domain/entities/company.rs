//! # Company Entity
//!
//! A tenant. Every user, product, and pre-order belongs to exactly one
//! company; verification quorums are scoped to the owning company.

use crate::domain::value_objects::CompanyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant company.
#[derive(Debug, Clone, Serialize)]
pub struct Company {
    /// Primary key.
    pub id: CompanyId,
    /// Unique company name.
    pub name: String,
    /// Unique company code.
    pub code: String,
    /// Short display alias.
    pub alias: String,
    /// Registered address.
    pub address: String,
    /// Bank giro reference.
    pub giro: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new company.
///
/// Doubles as the create/replace request body; `alias`, `address`, and
/// `giro` may be omitted there.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    /// Unique company name.
    pub name: String,
    /// Unique company code.
    pub code: String,
    /// Short display alias.
    #[serde(default)]
    pub alias: String,
    /// Registered address.
    #[serde(default)]
    pub address: String,
    /// Bank giro reference.
    #[serde(default)]
    pub giro: String,
}
