//! # Marketplace Integration
//!
//! Adapter for the PARI Corporate marketplace: product publication on
//! verification quorum and detail reads for published products.

pub mod client;
pub mod dto;
pub mod error;

pub use client::{MarketplaceApi, PariClient};
pub use dto::{ImageUpload, PariEnvelope, PariProduct, PariProductDetail, PariTransaction, PublishProduct};
pub use error::{MarketplaceError, MarketplaceResult};
