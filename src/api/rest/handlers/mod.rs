//! HTTP handlers, one module per route group.

pub mod auth;
pub mod companies;
pub mod open;
pub mod pre_orders;
pub mod products;
pub mod roles;
pub mod users;
