//! # Infrastructure Layer
//!
//! Adapters behind the domain ports: persistence backends, the marketplace
//! HTTP client, image storage, and authentication primitives.

pub mod auth;
pub mod marketplace;
pub mod persistence;
pub mod storage;
