//! # PARI Back-Office
//!
//! Multi-tenant back-office API for corporates selling on the PARI
//! marketplace: user, role, company, and giro administration, a product
//! catalog with image upload, and a multi-approver verification workflow
//! that publishes approved products to the marketplace.
//!
//! # Architecture
//!
//! ```text
//! api            REST handlers, router, guards, response envelopes
//! application    Use-case services and the application error taxonomy
//! domain         Entities, typed ids, status enums, domain errors
//! infrastructure Postgres + in-memory repositories, marketplace client,
//!                image storage, JWT/argon2/service-key auth
//! ```
//!
//! The verification workflow is the heart of the system: a subject
//! (product or pre-order) owned by a company flips from `processing` to
//! `approved` when every user holding the qualifying role in that company
//! has approved it. The transition is claimed with a single guarded update
//! so concurrent verifications produce exactly one transition; for
//! products, the claiming call publishes to the marketplace and releases
//! the claim on failure so a later verification retries.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
