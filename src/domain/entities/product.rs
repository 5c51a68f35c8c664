//! # Product Entity
//!
//! A catalog product owned by a company. Products are the primary subject of
//! the multi-party verification workflow: they start in `Processing`, collect
//! approvals from the company's qualifying users, and on reaching quorum are
//! published to the PARI Corporate marketplace, which assigns the external
//! `pari_product_id`.

use crate::domain::value_objects::{CompanyId, ProductId, SubjectStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A catalog product.
///
/// `image` holds the public path served to clients (`image/<file>`); the
/// temporary upload path used for the one-time marketplace publish is kept
/// private and cleared after a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Primary key.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Stock on hand.
    pub quantity: i32,
    /// Unit for `quantity` (kg, ton, ...).
    pub unit_quantity: String,
    /// Asking price.
    pub price: f64,
    /// Unit for `price`.
    pub unit_price: String,
    /// Public image path, empty once published.
    pub image: String,
    /// On-disk upload path. Never serialized.
    #[serde(skip_serializing)]
    pub tmp_image_path: String,
    /// Verification lifecycle status.
    pub status: SubjectStatus,
    /// Producer-declared production date (opaque form field).
    pub product_created_at: String,
    /// Producer-declared expiry date (opaque form field).
    pub expired_at: String,
    /// Commodity classification.
    pub commodity: String,
    /// Owning company.
    pub company_id: CompanyId,
    /// Whether the product is sold on pre-order terms.
    pub is_pre_order: bool,
    /// Lower bound for pre-order negotiation.
    pub min_price: f64,
    /// Upper bound for pre-order negotiation.
    pub max_price: f64,
    /// Marketplace identifier, assigned on publish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pari_product_id: Option<String>,
    /// Soft visibility flag.
    pub is_active: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Stock on hand.
    pub quantity: i32,
    /// Unit for `quantity`.
    pub unit_quantity: String,
    /// Asking price.
    pub price: f64,
    /// Unit for `price`.
    pub unit_price: String,
    /// Public image path.
    pub image: String,
    /// On-disk upload path.
    pub tmp_image_path: String,
    /// Initial lifecycle status.
    pub status: SubjectStatus,
    /// Producer-declared production date.
    pub product_created_at: String,
    /// Producer-declared expiry date.
    pub expired_at: String,
    /// Commodity classification.
    pub commodity: String,
    /// Owning company.
    pub company_id: CompanyId,
    /// Whether the product is sold on pre-order terms.
    pub is_pre_order: bool,
    /// Lower bound for pre-order negotiation.
    pub min_price: f64,
    /// Upper bound for pre-order negotiation.
    pub max_price: f64,
    /// Soft visibility flag.
    pub is_active: bool,
}

/// Mutable product fields for an ordinary update.
///
/// Absent fields keep their stored value. Status changes (including manual
/// rejection) go through this path; the verification workflow is the only
/// writer of the processing→approved transition.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New name, when present.
    pub name: Option<String>,
    /// New description, when present.
    pub description: Option<String>,
    /// New stock level, when present.
    pub quantity: Option<i32>,
    /// New asking price, when present.
    pub price: Option<f64>,
    /// New lifecycle status, when present.
    pub status: Option<SubjectStatus>,
    /// New commodity classification, when present.
    pub commodity: Option<String>,
    /// New pre-order bounds, when present.
    pub min_price: Option<f64>,
    /// New pre-order bounds, when present.
    pub max_price: Option<f64>,
    /// New visibility flag, when present.
    pub is_active: Option<bool>,
}

/// Filter for paged product reads, scoped to one company.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    /// Owning company.
    pub company_id: CompanyId,
    /// Restrict to one lifecycle status.
    pub status: Option<SubjectStatus>,
    /// Restrict to one commodity.
    pub commodity: Option<String>,
    /// Name-prefix search.
    pub search: Option<String>,
}

/// Per-status counts for one company's products.
///
/// The three status buckets partition `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Total subjects for the company.
    #[serde(rename = "all_product")]
    pub all: u64,
    /// Subjects still collecting approvals.
    #[serde(rename = "processing_product")]
    pub processing: u64,
    /// Subjects past quorum.
    #[serde(rename = "approved_product")]
    pub approved: u64,
    /// Explicitly rejected subjects.
    #[serde(rename = "rejected_product")]
    pub rejected: u64,
}

impl StatusSummary {
    /// Returns true if the per-status buckets sum to the total.
    #[must_use]
    pub const fn is_partition(&self) -> bool {
        self.processing + self.approved + self.rejected == self.all
    }
}
