//! # Pre-Order Service
//!
//! Pre-order transactions pushed by the marketplace, and their verification
//! workflow. Approval mirrors the product workflow but stays local: a claim
//! is final, there is no publish step.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{
    NewPreOrder, PreOrder, PreOrderFilter, PreOrderUpdate, StatusSummary,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CompanyId, PreOrderId, RoleId, SubjectStatus, UserId};
use crate::infrastructure::persistence::{
    Page, PreOrderApprovalRepository, PreOrderRepository, ProductRepository, RoleRepository,
};
use serde::Deserialize;
use std::sync::Arc;

/// Pre-order push from the marketplace. The product is referenced by its
/// marketplace id; the local product and company rows are resolved here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePreOrder {
    /// Marketplace product identifier.
    pub pari_product_id: String,
    /// Marketplace transaction identifier.
    pub pari_transaction_id: String,
    /// Ordered quantity.
    pub quantity: i32,
    /// Negotiated price.
    pub actual_price: f64,
    /// Buyer display name.
    pub buyer_name: String,
    /// Buyer address.
    #[serde(default)]
    pub buyer_address: String,
    /// Buyer contact detail.
    #[serde(default)]
    pub buyer_contact: String,
}

/// Verification request for a pre-order.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerifyPreOrder {
    /// Subject pre-order.
    pub pre_order_id: PreOrderId,
    /// Approving user.
    pub user_id: UserId,
    /// Company scope of the quorum.
    pub company_id: CompanyId,
    /// Qualifying role.
    pub role_id: RoleId,
}

/// A pre-order together with the caller's approval flag.
#[derive(Debug, Clone)]
pub struct VerifiedPreOrder {
    /// The subject after this verification.
    pub pre_order: PreOrder,
    /// Whether the calling user has approved the pre-order.
    pub is_verified_by_user: bool,
}

/// Pre-order operations.
#[derive(Debug, Clone)]
pub struct PreOrderService {
    pre_orders: Arc<dyn PreOrderRepository>,
    approvals: Arc<dyn PreOrderApprovalRepository>,
    products: Arc<dyn ProductRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl PreOrderService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        pre_orders: Arc<dyn PreOrderRepository>,
        approvals: Arc<dyn PreOrderApprovalRepository>,
        products: Arc<dyn ProductRepository>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            pre_orders,
            approvals,
            products,
            roles,
        }
    }

    /// Accepts a marketplace pre-order push, resolving the local product by
    /// its marketplace id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity and `NotFound`
    /// for an unknown marketplace product id.
    pub async fn create(&self, request: CreatePreOrder) -> ApplicationResult<PreOrder> {
        if request.quantity <= 0 {
            return Err(ApplicationError::validation("quantity must be positive"));
        }
        if request.buyer_name.trim().is_empty() {
            return Err(DomainError::empty_field("buyer_name").into());
        }

        let product = self
            .products
            .get_by_pari_id(&request.pari_product_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Product", &request.pari_product_id))?;

        Ok(self
            .pre_orders
            .create(NewPreOrder {
                pari_product_id: request.pari_product_id,
                pari_transaction_id: request.pari_transaction_id,
                product_id: product.id,
                company_id: product.company_id,
                quantity: request.quantity,
                status: SubjectStatus::Processing,
                actual_price: request.actual_price,
                buyer_name: request.buyer_name,
                buyer_address: request.buyer_address,
                buyer_contact: request.buyer_contact,
            })
            .await?)
    }

    /// Lists all pre-orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list(&self) -> ApplicationResult<Vec<PreOrder>> {
        Ok(self.pre_orders.list().await?)
    }

    /// Lists pre-orders matching a company-scoped filter, with the total
    /// matching count for the paging envelope.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list_by(
        &self,
        filter: &PreOrderFilter,
        page: Page,
    ) -> ApplicationResult<(Vec<PreOrder>, u64)> {
        let pre_orders = self.pre_orders.list_by(filter, page).await?;
        let total = self.pre_orders.count_by(filter).await?;
        Ok((pre_orders, total))
    }

    /// Gets a pre-order by id with joined product display fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the pre-order does not exist.
    pub async fn get(&self, id: PreOrderId) -> ApplicationResult<PreOrder> {
        self.pre_orders
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("PreOrder", id.to_string()))
    }

    /// Applies an ordinary field update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the pre-order does not exist.
    pub async fn update(
        &self,
        id: PreOrderId,
        update: PreOrderUpdate,
    ) -> ApplicationResult<PreOrder> {
        Ok(self.pre_orders.update(id, update).await?)
    }

    /// Deletes a pre-order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row was removed.
    pub async fn delete(&self, id: PreOrderId) -> ApplicationResult<()> {
        if self.pre_orders.delete(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("PreOrder", id.to_string()))
        }
    }

    /// Returns per-status counts for one company.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn summary(&self, company_id: CompanyId) -> ApplicationResult<StatusSummary> {
        Ok(self.pre_orders.summary(company_id).await?)
    }

    /// Records the caller's approval and claims the transition when the
    /// quorum completes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing pre-order or role.
    pub async fn verify(&self, request: VerifyPreOrder) -> ApplicationResult<VerifiedPreOrder> {
        let pre_order = self.get(request.pre_order_id).await?;
        let role = self
            .roles
            .get(request.role_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", request.role_id.to_string()))?;

        self.approvals
            .record(pre_order.id, request.user_id, request.company_id)
            .await?;

        self.pre_orders
            .claim_approval(pre_order.id, request.company_id, role.id)
            .await?;

        Ok(VerifiedPreOrder {
            pre_order: self.get(request.pre_order_id).await?,
            is_verified_by_user: true,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewProduct, NewRole, NewUser};
    use crate::domain::value_objects::VerificationLevel;
    use crate::infrastructure::persistence::{InMemoryStore, UserRepository};

    struct Fixture {
        service: PreOrderService,
        company: CompanyId,
        role: RoleId,
    }

    async fn fixture(verificators: usize) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let company = CompanyId::new(1);

        let role = {
            let roles: Arc<dyn RoleRepository> = store.clone();
            roles
                .create(NewRole {
                    name: "verificator".to_string(),
                })
                .await
                .unwrap()
        };
        let users: Arc<dyn UserRepository> = store.clone();
        for i in 0..verificators {
            users
                .create(NewUser {
                    name: format!("Verificator {i}"),
                    email: format!("v{i}@example.com"),
                    password_hash: "hash".to_string(),
                    verification_level: VerificationLevel::Basic,
                    role_id: role.id,
                    company_id: company,
                })
                .await
                .unwrap();
        }

        let products: Arc<dyn ProductRepository> = store.clone();
        let product = products
            .create(NewProduct {
                name: "Robusta beans".to_string(),
                description: String::new(),
                quantity: 500,
                unit_quantity: "kg".to_string(),
                price: 40_000.0,
                unit_price: "kg".to_string(),
                image: String::new(),
                tmp_image_path: String::new(),
                status: SubjectStatus::Approved,
                product_created_at: "2022-03-01".to_string(),
                expired_at: "2022-09-01".to_string(),
                commodity: "coffee".to_string(),
                company_id: company,
                is_pre_order: true,
                min_price: 35_000.0,
                max_price: 45_000.0,
                is_active: true,
            })
            .await
            .unwrap();
        products.set_published(product.id, "PARI-7").await.unwrap();

        let service = PreOrderService::new(store.clone(), store.clone(), store.clone(), store);
        Fixture {
            service,
            company,
            role: role.id,
        }
    }

    fn push(quantity: i32) -> CreatePreOrder {
        CreatePreOrder {
            pari_product_id: "PARI-7".to_string(),
            pari_transaction_id: "TRX-1".to_string(),
            quantity,
            actual_price: 42_000.0,
            buyer_name: "Budi".to_string(),
            buyer_address: "Jakarta".to_string(),
            buyer_contact: "0800".to_string(),
        }
    }

    #[tokio::test]
    async fn create_resolves_product_by_marketplace_id() {
        let fix = fixture(0).await;
        let order = fix.service.create(push(10)).await.unwrap();

        assert_eq!(order.company_id, fix.company);
        assert!(order.status.is_processing());
    }

    #[tokio::test]
    async fn create_rejects_unknown_marketplace_id() {
        let fix = fixture(0).await;
        let mut request = push(10);
        request.pari_product_id = "PARI-404".to_string();

        let err = fix.service.create(request).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn quorum_of_two_approves_on_second_verification() {
        let fix = fixture(2).await;
        let order = fix.service.create(push(10)).await.unwrap();

        let verify = |user: i64| VerifyPreOrder {
            pre_order_id: order.id,
            user_id: UserId::new(user),
            company_id: fix.company,
            role_id: fix.role,
        };

        let first = fix.service.verify(verify(100)).await.unwrap();
        assert!(first.pre_order.status.is_processing());

        let second = fix.service.verify(verify(101)).await.unwrap();
        assert!(second.pre_order.status.is_approved());
        assert!(second.is_verified_by_user);
    }

    #[tokio::test]
    async fn verify_missing_pre_order_is_not_found() {
        let fix = fixture(1).await;
        let err = fix
            .service
            .verify(VerifyPreOrder {
                pre_order_id: PreOrderId::new(999),
                user_id: UserId::new(100),
                company_id: fix.company,
                role_id: fix.role,
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
