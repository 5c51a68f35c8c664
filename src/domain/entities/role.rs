//! # Role Entity
//!
//! Roles gate policy decisions and define verification quorums: the quorum
//! for a subject is the number of users in the owning company holding the
//! qualifying role named in the verification request.

use crate::domain::value_objects::RoleId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named role, unique per deployment.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    /// Primary key.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new role.
#[derive(Debug, Clone)]
pub struct NewRole {
    /// Unique role name.
    pub name: String,
}
