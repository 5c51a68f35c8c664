//! # Giro Entity
//!
//! Bank giro lookup records used to validate a company during onboarding:
//! a prospective tenant presents a giro code and the service answers with
//! the company name on record.

use crate::domain::value_objects::GiroId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A bank giro record.
#[derive(Debug, Clone, Serialize)]
pub struct Giro {
    /// Primary key.
    pub id: GiroId,
    /// Unique giro code.
    pub code: String,
    /// Company name registered for the code.
    pub company_name: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}
