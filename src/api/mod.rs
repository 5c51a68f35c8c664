//! # API Layer
//!
//! External interfaces to the system.

pub mod rest;
