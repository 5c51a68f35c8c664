//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`UserId`], [`RoleId`], [`CompanyId`], [`GiroId`]: directory identifiers
//! - [`ProductId`], [`PreOrderId`], [`ApprovalId`]: catalog and workflow
//!   identifiers
//!
//! ## Domain Enums
//!
//! - [`SubjectStatus`]: verification lifecycle (processing / approved /
//!   rejected)
//! - [`VerificationLevel`]: user KYC level

pub mod ids;
pub mod status;

pub use ids::{ApprovalId, CompanyId, GiroId, PreOrderId, ProductId, RoleId, UserId};
pub use status::{ParseEnumError, SubjectStatus, VerificationLevel};
