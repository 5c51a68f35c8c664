//! # User Entity
//!
//! A registered back-office user. Users belong to exactly one company, hold
//! exactly one role, and count toward the verification quorum of subjects
//! owned by their company when their role matches the qualifying role.

use crate::domain::value_objects::{CompanyId, RoleId, UserId, VerificationLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user.
///
/// `role_name` and `company_name` are denormalized display fields populated
/// by joined reads; plain reads leave them `None`. The password hash never
/// leaves the service.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// KYC verification level.
    pub verification_level: VerificationLevel,
    /// Role held by this user.
    pub role_id: RoleId,
    /// Role name from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    /// Owning company.
    pub company_id: CompanyId,
    /// Company name from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Set until the user replaces the password issued at registration.
    pub must_change_password: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// KYC verification level.
    pub verification_level: VerificationLevel,
    /// Role held by this user.
    pub role_id: RoleId,
    /// Owning company.
    pub company_id: CompanyId,
}

/// Mutable user fields for an ordinary update.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New display name, when present.
    pub name: Option<String>,
    /// New email, when present.
    pub email: Option<String>,
    /// New role, when present.
    pub role_id: Option<RoleId>,
    /// New company, when present.
    pub company_id: Option<CompanyId>,
    /// New verification level, when present.
    pub verification_level: Option<VerificationLevel>,
}
