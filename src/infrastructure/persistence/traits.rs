//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that abstract
//! persistence operations. The production backend is PostgreSQL; an
//! in-memory backend backs the unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`], [`RoleRepository`], [`CompanyRepository`],
//!   [`GiroRepository`]: directory data
//! - [`ProductRepository`], [`PreOrderRepository`]: verification subjects
//! - [`ProductApprovalRepository`], [`PreOrderApprovalRepository`]:
//!   per-user approval records
//! - [`PolicyRepository`]: access-control policies and user→role groupings
//!
//! The quorum transition lives behind [`ProductRepository::claim_approval`]
//! and [`PreOrderRepository::claim_approval`]: a single guarded
//! read-modify-write that flips `processing` to `approved` only while the
//! subject is still processing and the approval count has reached the
//! qualifying-role population. Two racing verifications therefore produce
//! exactly one transition.

use crate::domain::entities::{
    Company, Giro, NewCompany, NewPreOrder, NewProduct, NewRole, NewUser, PreOrder, PreOrderFilter,
    PreOrderUpdate, Product, ProductFilter, ProductUpdate, Role, StatusSummary, User, UserUpdate,
};
use crate::domain::value_objects::{CompanyId, GiroId, PreOrderId, ProductId, RoleId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Unique constraint violated.
    #[error("duplicate entity: {entity_type} ({detail})")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Violated key.
        detail: String,
    },

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("query error: {0}")]
    Query(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, detail: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            detail: detail.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Paging window for list reads.
///
/// `page` is 1-based. [`Page::all`] disables paging, matching the
/// behavior of list endpoints called without paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number; 0 disables paging.
    pub page: u32,
    /// Rows per page; 0 disables paging.
    pub size: u32,
}

impl Page {
    /// Creates a paging window.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Returns the unpaged window.
    #[must_use]
    pub const fn all() -> Self {
        Self { page: 0, size: 0 }
    }

    /// Returns true if this window disables paging.
    #[must_use]
    pub const fn is_unpaged(self) -> bool {
        self.page == 0 || self.size == 0
    }

    /// Returns the row offset for this window, `None` when unpaged.
    #[must_use]
    pub const fn offset(self) -> Option<u64> {
        if self.is_unpaged() {
            None
        } else {
            Some((self.page as u64 - 1) * self.size as u64)
        }
    }
}

/// Repository for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + fmt::Debug {
    /// Persists a new user and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` when the email is taken.
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    /// Lists all users with joined role and company names.
    async fn list(&self) -> RepositoryResult<Vec<User>>;

    /// Gets a user by id with joined role and company names.
    ///
    /// Returns `None` if the user does not exist.
    async fn get(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Gets a user by login email with joined role and company names.
    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Applies an ordinary field update.
    async fn update(&self, id: UserId, update: UserUpdate) -> RepositoryResult<User>;

    /// Replaces the password hash and clears `must_change_password`.
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<User>;

    /// Deletes a user. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: UserId) -> RepositoryResult<bool>;

    /// Counts users in a company holding the given role.
    ///
    /// This is the verification quorum for subjects owned by the company.
    async fn count_with_role(&self, company_id: CompanyId, role_id: RoleId)
    -> RepositoryResult<u64>;

    /// Counts all users.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync + fmt::Debug {
    /// Persists a new role.
    async fn create(&self, role: NewRole) -> RepositoryResult<Role>;

    /// Lists all roles.
    async fn list(&self) -> RepositoryResult<Vec<Role>>;

    /// Gets a role by id. Returns `None` if absent.
    async fn get(&self, id: RoleId) -> RepositoryResult<Option<Role>>;

    /// Gets a role by its unique name. Returns `None` if absent.
    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Role>>;

    /// Renames a role.
    async fn update(&self, id: RoleId, name: &str) -> RepositoryResult<Role>;

    /// Deletes a role. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: RoleId) -> RepositoryResult<bool>;
}

/// Repository for company records.
#[async_trait]
pub trait CompanyRepository: Send + Sync + fmt::Debug {
    /// Persists a new company.
    async fn create(&self, company: NewCompany) -> RepositoryResult<Company>;

    /// Lists all companies.
    async fn list(&self) -> RepositoryResult<Vec<Company>>;

    /// Gets a company by id. Returns `None` if absent.
    async fn get(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;

    /// Replaces the mutable company fields.
    async fn update(&self, id: CompanyId, company: NewCompany) -> RepositoryResult<Company>;

    /// Deletes a company. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: CompanyId) -> RepositoryResult<bool>;
}

/// Repository for giro lookup records.
#[async_trait]
pub trait GiroRepository: Send + Sync + fmt::Debug {
    /// Gets a giro record by its unique code. Returns `None` if absent.
    async fn get_by_code(&self, code: &str) -> RepositoryResult<Option<Giro>>;

    /// Gets a giro record by id. Returns `None` if absent.
    async fn get(&self, id: GiroId) -> RepositoryResult<Option<Giro>>;
}

/// Repository for product records.
#[async_trait]
pub trait ProductRepository: Send + Sync + fmt::Debug {
    /// Persists a new product.
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product>;

    /// Lists all products.
    async fn list(&self) -> RepositoryResult<Vec<Product>>;

    /// Lists products matching a company-scoped filter, oldest first.
    async fn list_by(&self, filter: &ProductFilter, page: Page) -> RepositoryResult<Vec<Product>>;

    /// Gets a product by id. Returns `None` if absent.
    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>>;

    /// Gets a product by its marketplace identifier. Returns `None` if absent.
    async fn get_by_pari_id(&self, pari_product_id: &str) -> RepositoryResult<Option<Product>>;

    /// Applies an ordinary field update.
    async fn update(&self, id: ProductId, update: ProductUpdate) -> RepositoryResult<Product>;

    /// Subtracts `quantity` from stock in a single guarded statement.
    ///
    /// Returns the updated row, or `None` when no product carries the
    /// marketplace id or its stock is below `quantity`, so two racing
    /// decrements cannot both pass the stock check.
    async fn decrement_quantity(
        &self,
        pari_product_id: &str,
        quantity: i32,
    ) -> RepositoryResult<Option<Product>>;

    /// Deletes a product. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: ProductId) -> RepositoryResult<bool>;

    /// Counts products matching a company-scoped filter.
    async fn count_by(&self, filter: &ProductFilter) -> RepositoryResult<u64>;

    /// Returns per-status counts for one company.
    async fn summary(&self, company_id: CompanyId) -> RepositoryResult<StatusSummary>;

    /// Attempts the processing→approved transition.
    ///
    /// Flips the status in a single guarded statement when the product is
    /// still processing and its approval count has reached the number of
    /// users in `company_id` holding `role_id`. Returns `Ok(true)` only for
    /// the call that performed the flip.
    async fn claim_approval(
        &self,
        id: ProductId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool>;

    /// Reverts a claimed approval back to processing.
    ///
    /// Used when the marketplace publish fails after the claim, so a later
    /// verification call can retry.
    async fn release_claim(&self, id: ProductId) -> RepositoryResult<()>;

    /// Records a successful marketplace publish: stores the external id and
    /// clears the local image references.
    async fn set_published(
        &self,
        id: ProductId,
        pari_product_id: &str,
    ) -> RepositoryResult<Product>;
}

/// Repository for product approval records.
#[async_trait]
pub trait ProductApprovalRepository: Send + Sync + fmt::Debug {
    /// Records an approval if absent.
    ///
    /// Returns `Ok(true)` when a new record was inserted, `Ok(false)` when
    /// the (product, user) pair had already approved.
    async fn record(
        &self,
        product_id: ProductId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool>;

    /// Returns true if the user has approved the product.
    async fn exists(&self, product_id: ProductId, user_id: UserId) -> RepositoryResult<bool>;

    /// Counts approvals recorded for a product within a company.
    async fn count(&self, product_id: ProductId, company_id: CompanyId) -> RepositoryResult<u64>;
}

/// Repository for pre-order records.
#[async_trait]
pub trait PreOrderRepository: Send + Sync + fmt::Debug {
    /// Persists a new pre-order.
    async fn create(&self, pre_order: NewPreOrder) -> RepositoryResult<PreOrder>;

    /// Lists all pre-orders.
    async fn list(&self) -> RepositoryResult<Vec<PreOrder>>;

    /// Lists pre-orders matching a company-scoped filter, oldest first,
    /// with joined product display fields.
    async fn list_by(&self, filter: &PreOrderFilter, page: Page) -> RepositoryResult<Vec<PreOrder>>;

    /// Gets a pre-order by id with joined product display fields.
    async fn get(&self, id: PreOrderId) -> RepositoryResult<Option<PreOrder>>;

    /// Applies an ordinary field update.
    async fn update(&self, id: PreOrderId, update: PreOrderUpdate) -> RepositoryResult<PreOrder>;

    /// Deletes a pre-order. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, id: PreOrderId) -> RepositoryResult<bool>;

    /// Counts pre-orders matching a company-scoped filter.
    async fn count_by(&self, filter: &PreOrderFilter) -> RepositoryResult<u64>;

    /// Returns per-status counts for one company.
    async fn summary(&self, company_id: CompanyId) -> RepositoryResult<StatusSummary>;

    /// Attempts the processing→approved transition.
    ///
    /// Same guarded semantics as
    /// [`ProductRepository::claim_approval`]; the pre-order variant has no
    /// publish step, so a claim is final.
    async fn claim_approval(
        &self,
        id: PreOrderId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool>;
}

/// Repository for pre-order approval records.
#[async_trait]
pub trait PreOrderApprovalRepository: Send + Sync + fmt::Debug {
    /// Records an approval if absent. Returns `Ok(true)` when inserted.
    async fn record(
        &self,
        pre_order_id: PreOrderId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool>;

    /// Returns true if the user has approved the pre-order.
    async fn exists(&self, pre_order_id: PreOrderId, user_id: UserId) -> RepositoryResult<bool>;

    /// Counts approvals recorded for a pre-order within a company.
    async fn count(&self, pre_order_id: PreOrderId, company_id: CompanyId)
    -> RepositoryResult<u64>;
}

/// Repository for access-control policies.
///
/// Policies are (subject, object, action) triples where the subject is a
/// role name; groupings map a user id onto a role name. Checks reload from
/// storage on every call, so policy edits take effect immediately.
#[async_trait]
pub trait PolicyRepository: Send + Sync + fmt::Debug {
    /// Adds a policy triple if absent. Returns `Ok(true)` when inserted.
    async fn add_policy(&self, subject: &str, object: &str, action: &str)
    -> RepositoryResult<bool>;

    /// Returns true if the exact policy triple exists.
    async fn has_policy(&self, subject: &str, object: &str, action: &str)
    -> RepositoryResult<bool>;

    /// Maps a user onto a role-name group. Returns `Ok(true)` when inserted.
    async fn add_grouping(&self, user_id: UserId, group: &str) -> RepositoryResult<bool>;

    /// Lists the role-name groups a user belongs to.
    async fn groups_of(&self, user_id: UserId) -> RepositoryResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repository_error {
        use super::*;

        #[test]
        fn not_found_error() {
            let err = RepositoryError::not_found("Product", "42");
            assert!(err.is_not_found());
            assert!(!err.is_duplicate());
            assert!(err.to_string().contains("not found"));
            assert!(err.to_string().contains("Product"));
            assert!(err.to_string().contains("42"));
        }

        #[test]
        fn duplicate_error() {
            let err = RepositoryError::duplicate("User", "email");
            assert!(err.is_duplicate());
            assert!(!err.is_not_found());
            assert!(err.to_string().contains("duplicate"));
        }

        #[test]
        fn query_error() {
            let err = RepositoryError::query("syntax error");
            assert!(err.to_string().contains("syntax error"));
        }
    }

    mod page {
        use super::*;

        #[test]
        fn unpaged_when_zero() {
            assert!(Page::all().is_unpaged());
            assert!(Page::new(0, 10).is_unpaged());
            assert!(Page::new(1, 0).is_unpaged());
            assert_eq!(Page::all().offset(), None);
        }

        #[test]
        fn offset_is_one_based() {
            assert_eq!(Page::new(1, 20).offset(), Some(0));
            assert_eq!(Page::new(3, 20).offset(), Some(40));
        }
    }
}
