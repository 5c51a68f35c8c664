//! # Pre-Order Entity
//!
//! A pre-order transaction pushed by the marketplace against a published
//! product. Pre-orders mirror the product verification workflow: the owning
//! company's qualifying users must all approve before the order is acted on,
//! but approval is purely local, with no marketplace call-out.

use crate::domain::value_objects::{CompanyId, PreOrderId, ProductId, SubjectStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pre-order transaction.
///
/// The `product_*` fields are denormalized display values from a joined
/// read; plain reads leave them `None`.
#[derive(Debug, Clone, Serialize)]
pub struct PreOrder {
    /// Primary key.
    pub id: PreOrderId,
    /// Marketplace product identifier this order refers to.
    pub pari_product_id: String,
    /// Marketplace transaction identifier.
    pub pari_transaction_id: String,
    /// Local product row.
    pub product_id: ProductId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Ordered quantity.
    pub quantity: i32,
    /// Verification lifecycle status.
    pub status: SubjectStatus,
    /// Negotiated price.
    pub actual_price: f64,
    /// Buyer display name.
    pub buyer_name: String,
    /// Buyer address.
    pub buyer_address: String,
    /// Buyer contact detail.
    pub buyer_contact: String,
    /// Product name from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Product commodity from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_commodity: Option<String>,
    /// Product image path from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    /// Product price floor from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_min_price: Option<f64>,
    /// Product price ceiling from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_max_price: Option<f64>,
    /// Product expiry date from a joined read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_expired_at: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new pre-order.
#[derive(Debug, Clone)]
pub struct NewPreOrder {
    /// Marketplace product identifier.
    pub pari_product_id: String,
    /// Marketplace transaction identifier.
    pub pari_transaction_id: String,
    /// Local product row.
    pub product_id: ProductId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Ordered quantity.
    pub quantity: i32,
    /// Initial lifecycle status.
    pub status: SubjectStatus,
    /// Negotiated price.
    pub actual_price: f64,
    /// Buyer display name.
    pub buyer_name: String,
    /// Buyer address.
    pub buyer_address: String,
    /// Buyer contact detail.
    pub buyer_contact: String,
}

/// Mutable pre-order fields for an ordinary update.
#[derive(Debug, Clone, Default)]
pub struct PreOrderUpdate {
    /// New quantity, when present.
    pub quantity: Option<i32>,
    /// New lifecycle status, when present.
    pub status: Option<SubjectStatus>,
    /// New negotiated price, when present.
    pub actual_price: Option<f64>,
    /// New buyer name, when present.
    pub buyer_name: Option<String>,
    /// New buyer address, when present.
    pub buyer_address: Option<String>,
    /// New buyer contact, when present.
    pub buyer_contact: Option<String>,
}

/// Filter for paged pre-order reads, scoped to one company.
#[derive(Debug, Clone)]
pub struct PreOrderFilter {
    /// Owning company.
    pub company_id: CompanyId,
    /// Restrict to one lifecycle status.
    pub status: Option<SubjectStatus>,
    /// Restrict to one product commodity (via the joined product).
    pub commodity: Option<String>,
    /// Buyer-name-prefix search.
    pub search: Option<String>,
}
