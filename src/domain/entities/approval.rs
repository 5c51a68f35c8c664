//! # Approval Records
//!
//! Join records stating "user U has approved subject S". One row per
//! (subject, user); the unique index makes repeat verification by the same
//! user a no-op rather than a second vote. Rows are only ever inserted by
//! the verification workflow, never updated or deleted.

use crate::domain::value_objects::{ApprovalId, CompanyId, PreOrderId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's approval of a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductApproval {
    /// Primary key.
    pub id: ApprovalId,
    /// Approved product.
    pub product_id: ProductId,
    /// Approving user.
    pub user_id: UserId,
    /// Company scope of the quorum.
    pub company_id: CompanyId,
    /// When the approval was recorded.
    pub created_at: DateTime<Utc>,
}

/// A user's approval of a pre-order transaction.
#[derive(Debug, Clone, Serialize)]
pub struct PreOrderApproval {
    /// Primary key.
    pub id: ApprovalId,
    /// Approved pre-order.
    pub pre_order_id: PreOrderId,
    /// Approving user.
    pub user_id: UserId,
    /// Company scope of the quorum.
    pub company_id: CompanyId,
    /// When the approval was recorded.
    pub created_at: DateTime<Utc>,
}
