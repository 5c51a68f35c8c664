//! # Application Layer
//!
//! Use-case services and the application error taxonomy.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
