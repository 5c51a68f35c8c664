//! # Domain Layer
//!
//! Entities, value objects and business rules, free of persistence and
//! transport concerns.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
