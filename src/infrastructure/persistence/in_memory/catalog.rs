//! In-memory product, pre-order and approval repositories.
//!
//! `claim_approval` does its count-and-flip under one write guard, matching
//! the single-statement guarantee of the SQL backend.

use super::InMemoryStore;
use crate::domain::entities::{
    NewPreOrder, NewProduct, PreOrder, PreOrderApproval, PreOrderFilter, PreOrderUpdate, Product,
    ProductApproval, ProductFilter, ProductUpdate, StatusSummary,
};
use crate::domain::value_objects::{
    ApprovalId, CompanyId, PreOrderId, ProductId, RoleId, SubjectStatus, UserId,
};
use crate::infrastructure::persistence::traits::{
    Page, PreOrderApprovalRepository, PreOrderRepository, ProductApprovalRepository,
    ProductRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::Utc;

fn matches_product(product: &Product, filter: &ProductFilter) -> bool {
    product.company_id == filter.company_id
        && filter.status.is_none_or(|s| product.status == s)
        && filter
            .commodity
            .as_ref()
            .is_none_or(|c| product.commodity == *c)
        && filter
            .search
            .as_ref()
            .is_none_or(|s| product.name.to_lowercase().starts_with(&s.to_lowercase()))
}

fn apply_page<T>(items: Vec<T>, page: Page) -> Vec<T> {
    match page.offset() {
        None => items,
        Some(offset) => items
            .into_iter()
            .skip(offset as usize)
            .take(page.size as usize)
            .collect(),
    }
}

fn summarize(statuses: impl Iterator<Item = SubjectStatus>) -> StatusSummary {
    let mut summary = StatusSummary {
        all: 0,
        processing: 0,
        approved: 0,
        rejected: 0,
    };
    for status in statuses {
        summary.all += 1;
        match status {
            SubjectStatus::Processing => summary.processing += 1,
            SubjectStatus::Approved => summary.approved += 1,
            SubjectStatus::Rejected => summary.rejected += 1,
        }
    }
    summary
}

/// Fills the denormalized product display fields.
fn join_pre_order(inner: &super::Inner, pre_order: &PreOrder) -> PreOrder {
    let mut pre_order = pre_order.clone();
    if let Some(product) = inner.products.get(&pre_order.product_id.value()) {
        pre_order.product_name = Some(product.name.clone());
        pre_order.product_commodity = Some(product.commodity.clone());
        pre_order.product_image = Some(product.image.clone());
        pre_order.product_min_price = Some(product.min_price);
        pre_order.product_max_price = Some(product.max_price);
        pre_order.product_expired_at = Some(product.expired_at.clone());
    }
    pre_order
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let now = Utc::now();
        let stored = Product {
            id: ProductId::new(id),
            name: product.name,
            description: product.description,
            quantity: product.quantity,
            unit_quantity: product.unit_quantity,
            price: product.price,
            unit_price: product.unit_price,
            image: product.image,
            tmp_image_path: product.tmp_image_path,
            status: product.status,
            product_created_at: product.product_created_at,
            expired_at: product.expired_at,
            commodity: product.commodity,
            company_id: product.company_id,
            is_pre_order: product.is_pre_order,
            min_price: product.min_price,
            max_price: product.max_price,
            pari_product_id: None,
            is_active: product.is_active,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by_key(|p| (p.created_at, p.id.value()));
        Ok(products)
    }

    async fn list_by(&self, filter: &ProductFilter, page: Page) -> RepositoryResult<Vec<Product>> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| matches_product(p, filter))
            .cloned()
            .collect();
        products.sort_by_key(|p| (p.created_at, p.id.value()));
        Ok(apply_page(products, page))
    }

    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner.products.get(&id.value()).cloned())
    }

    async fn get_by_pari_id(&self, pari_product_id: &str) -> RepositoryResult<Option<Product>> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .find(|p| p.pari_product_id.as_deref() == Some(pari_product_id))
            .cloned())
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> RepositoryResult<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("Product", id.to_string()))?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(quantity) = update.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(status) = update.status {
            product.status = status;
        }
        if let Some(commodity) = update.commodity {
            product.commodity = commodity;
        }
        if let Some(min_price) = update.min_price {
            product.min_price = min_price;
        }
        if let Some(max_price) = update.max_price {
            product.max_price = max_price;
        }
        if let Some(is_active) = update.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn decrement_quantity(
        &self,
        pari_product_id: &str,
        quantity: i32,
    ) -> RepositoryResult<Option<Product>> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .values_mut()
            .find(|p| p.pari_product_id.as_deref() == Some(pari_product_id));
        match product {
            Some(product) if product.quantity >= quantity => {
                product.quantity -= quantity;
                product.updated_at = Utc::now();
                Ok(Some(product.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: ProductId) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.remove(&id.value()).is_some())
    }

    async fn count_by(&self, filter: &ProductFilter) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| matches_product(p, filter))
            .count() as u64)
    }

    async fn summary(&self, company_id: CompanyId) -> RepositoryResult<StatusSummary> {
        let inner = self.inner.read().await;
        Ok(summarize(
            inner
                .products
                .values()
                .filter(|p| p.company_id == company_id)
                .map(|p| p.status),
        ))
    }

    async fn claim_approval(
        &self,
        id: ProductId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        let quorum = inner.qualifying_users(company_id.value(), role_id.value());
        let approvals = inner
            .product_approvals
            .iter()
            .filter(|a| a.product_id == id && a.company_id == company_id)
            .count() as u64;

        let Some(product) = inner.products.get_mut(&id.value()) else {
            return Ok(false);
        };
        if !product.status.is_processing() || quorum == 0 || approvals < quorum {
            return Ok(false);
        }

        product.status = SubjectStatus::Approved;
        product.updated_at = Utc::now();
        Ok(true)
    }

    async fn release_claim(&self, id: ProductId) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(product) = inner.products.get_mut(&id.value())
            && product.status.is_approved()
        {
            product.status = SubjectStatus::Processing;
            product.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_published(
        &self,
        id: ProductId,
        pari_product_id: &str,
    ) -> RepositoryResult<Product> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("Product", id.to_string()))?;

        product.pari_product_id = Some(pari_product_id.to_string());
        product.image = String::new();
        product.tmp_image_path = String::new();
        product.updated_at = Utc::now();
        Ok(product.clone())
    }
}

#[async_trait]
impl ProductApprovalRepository for InMemoryStore {
    async fn record(
        &self,
        product_id: ProductId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        if inner
            .product_approvals
            .iter()
            .any(|a| a.product_id == product_id && a.user_id == user_id)
        {
            return Ok(false);
        }

        let id = inner.next_id();
        inner.product_approvals.push(ProductApproval {
            id: ApprovalId::new(id),
            product_id,
            user_id,
            company_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn exists(&self, product_id: ProductId, user_id: UserId) -> RepositoryResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .product_approvals
            .iter()
            .any(|a| a.product_id == product_id && a.user_id == user_id))
    }

    async fn count(&self, product_id: ProductId, company_id: CompanyId) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .product_approvals
            .iter()
            .filter(|a| a.product_id == product_id && a.company_id == company_id)
            .count() as u64)
    }
}

#[async_trait]
impl PreOrderRepository for InMemoryStore {
    async fn create(&self, pre_order: NewPreOrder) -> RepositoryResult<PreOrder> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let now = Utc::now();
        let stored = PreOrder {
            id: PreOrderId::new(id),
            pari_product_id: pre_order.pari_product_id,
            pari_transaction_id: pre_order.pari_transaction_id,
            product_id: pre_order.product_id,
            company_id: pre_order.company_id,
            quantity: pre_order.quantity,
            status: pre_order.status,
            actual_price: pre_order.actual_price,
            buyer_name: pre_order.buyer_name,
            buyer_address: pre_order.buyer_address,
            buyer_contact: pre_order.buyer_contact,
            product_name: None,
            product_commodity: None,
            product_image: None,
            product_min_price: None,
            product_max_price: None,
            product_expired_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.pre_orders.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> RepositoryResult<Vec<PreOrder>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<PreOrder> = inner
            .pre_orders
            .values()
            .map(|o| join_pre_order(&inner, o))
            .collect();
        orders.sort_by_key(|o| (o.created_at, o.id.value()));
        Ok(orders)
    }

    async fn list_by(
        &self,
        filter: &PreOrderFilter,
        page: Page,
    ) -> RepositoryResult<Vec<PreOrder>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<PreOrder> = inner
            .pre_orders
            .values()
            .map(|o| join_pre_order(&inner, o))
            .filter(|o| {
                o.company_id == filter.company_id
                    && filter.status.is_none_or(|s| o.status == s)
                    && filter
                        .commodity
                        .as_ref()
                        .is_none_or(|c| o.product_commodity.as_deref() == Some(c))
                    && filter.search.as_ref().is_none_or(|s| {
                        o.buyer_name.to_lowercase().starts_with(&s.to_lowercase())
                    })
            })
            .collect();
        orders.sort_by_key(|o| (o.created_at, o.id.value()));
        Ok(apply_page(orders, page))
    }

    async fn get(&self, id: PreOrderId) -> RepositoryResult<Option<PreOrder>> {
        let inner = self.inner.read().await;
        Ok(inner
            .pre_orders
            .get(&id.value())
            .map(|o| join_pre_order(&inner, o)))
    }

    async fn update(&self, id: PreOrderId, update: PreOrderUpdate) -> RepositoryResult<PreOrder> {
        let mut inner = self.inner.write().await;
        let order = inner
            .pre_orders
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("PreOrder", id.to_string()))?;

        if let Some(quantity) = update.quantity {
            order.quantity = quantity;
        }
        if let Some(status) = update.status {
            order.status = status;
        }
        if let Some(actual_price) = update.actual_price {
            order.actual_price = actual_price;
        }
        if let Some(buyer_name) = update.buyer_name {
            order.buyer_name = buyer_name;
        }
        if let Some(buyer_address) = update.buyer_address {
            order.buyer_address = buyer_address;
        }
        if let Some(buyer_contact) = update.buyer_contact {
            order.buyer_contact = buyer_contact;
        }
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn delete(&self, id: PreOrderId) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.pre_orders.remove(&id.value()).is_some())
    }

    async fn count_by(&self, filter: &PreOrderFilter) -> RepositoryResult<u64> {
        Ok(PreOrderRepository::list_by(self, filter, Page::all())
            .await?
            .len() as u64)
    }

    async fn summary(&self, company_id: CompanyId) -> RepositoryResult<StatusSummary> {
        let inner = self.inner.read().await;
        Ok(summarize(
            inner
                .pre_orders
                .values()
                .filter(|o| o.company_id == company_id)
                .map(|o| o.status),
        ))
    }

    async fn claim_approval(
        &self,
        id: PreOrderId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        let quorum = inner.qualifying_users(company_id.value(), role_id.value());
        let approvals = inner
            .pre_order_approvals
            .iter()
            .filter(|a| a.pre_order_id == id && a.company_id == company_id)
            .count() as u64;

        let Some(order) = inner.pre_orders.get_mut(&id.value()) else {
            return Ok(false);
        };
        if !order.status.is_processing() || quorum == 0 || approvals < quorum {
            return Ok(false);
        }

        order.status = SubjectStatus::Approved;
        order.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl PreOrderApprovalRepository for InMemoryStore {
    async fn record(
        &self,
        pre_order_id: PreOrderId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        if inner
            .pre_order_approvals
            .iter()
            .any(|a| a.pre_order_id == pre_order_id && a.user_id == user_id)
        {
            return Ok(false);
        }

        let id = inner.next_id();
        inner.pre_order_approvals.push(PreOrderApproval {
            id: ApprovalId::new(id),
            pre_order_id,
            user_id,
            company_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn exists(&self, pre_order_id: PreOrderId, user_id: UserId) -> RepositoryResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .pre_order_approvals
            .iter()
            .any(|a| a.pre_order_id == pre_order_id && a.user_id == user_id))
    }

    async fn count(
        &self,
        pre_order_id: PreOrderId,
        company_id: CompanyId,
    ) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .pre_order_approvals
            .iter()
            .filter(|a| a.pre_order_id == pre_order_id && a.company_id == company_id)
            .count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUser;
    use crate::domain::value_objects::VerificationLevel;
    use crate::infrastructure::persistence::traits::UserRepository;

    fn new_product(company_id: CompanyId) -> NewProduct {
        NewProduct {
            name: "Robusta beans".to_string(),
            description: "Grade 1".to_string(),
            quantity: 500,
            unit_quantity: "kg".to_string(),
            price: 40_000.0,
            unit_price: "kg".to_string(),
            image: "image/robusta.jpg".to_string(),
            tmp_image_path: "/tmp/upload/robusta.jpg".to_string(),
            status: SubjectStatus::Processing,
            product_created_at: "2022-03-01".to_string(),
            expired_at: "2022-09-01".to_string(),
            commodity: "coffee".to_string(),
            company_id,
            is_pre_order: false,
            min_price: 0.0,
            max_price: 0.0,
            is_active: true,
        }
    }

    async fn seed_verificators(store: &InMemoryStore, company_id: CompanyId, count: usize) -> RoleId {
        let role = RoleId::new(777);
        for i in 0..count {
            UserRepository::create(
                store,
                NewUser {
                    name: format!("Verificator {i}"),
                    email: format!("v{i}@example.com"),
                    password_hash: "hash".to_string(),
                    verification_level: VerificationLevel::Basic,
                    role_id: role,
                    company_id,
                },
            )
            .await
            .unwrap();
        }
        role
    }

    #[tokio::test]
    async fn claim_requires_full_quorum() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let role = seed_verificators(&store, company, 3).await;
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();

        for i in 0..2 {
            ProductApprovalRepository::record(&store, product.id, UserId::new(100 + i), company)
                .await
                .unwrap();
        }
        assert!(
            !ProductRepository::claim_approval(&store, product.id, company, role)
                .await
                .unwrap()
        );

        ProductApprovalRepository::record(&store, product.id, UserId::new(102), company)
            .await
            .unwrap();
        assert!(
            ProductRepository::claim_approval(&store, product.id, company, role)
                .await
                .unwrap()
        );

        let stored = ProductRepository::get(&store, product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SubjectStatus::Approved);
    }

    #[tokio::test]
    async fn zero_quorum_never_qualifies() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();

        // No users hold the qualifying role.
        assert!(
            !ProductRepository::claim_approval(&store, product.id, company, RoleId::new(777))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn repeated_approval_is_a_no_op() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();
        let user = UserId::new(100);

        assert!(
            ProductApprovalRepository::record(&store, product.id, user, company)
                .await
                .unwrap()
        );
        assert!(
            !ProductApprovalRepository::record(&store, product.id, user, company)
                .await
                .unwrap()
        );
        assert_eq!(
            ProductApprovalRepository::count(&store, product.id, company)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn racing_claims_produce_one_transition() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let role = seed_verificators(&store, company, 2).await;
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();

        for i in 0..2 {
            ProductApprovalRepository::record(&store, product.id, UserId::new(100 + i), company)
                .await
                .unwrap();
        }

        let (a, b) = tokio::join!(
            ProductRepository::claim_approval(&store, product.id, company, role),
            ProductRepository::claim_approval(&store, product.id, company, role),
        );
        let flips = [a.unwrap(), b.unwrap()].iter().filter(|f| **f).count();
        assert_eq!(flips, 1);
    }

    #[tokio::test]
    async fn release_claim_reopens_processing() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let role = seed_verificators(&store, company, 1).await;
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();
        ProductApprovalRepository::record(&store, product.id, UserId::new(100), company)
            .await
            .unwrap();
        assert!(
            ProductRepository::claim_approval(&store, product.id, company, role)
                .await
                .unwrap()
        );

        store.release_claim(product.id).await.unwrap();
        let stored = ProductRepository::get(&store, product.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SubjectStatus::Processing);

        // The approvals are still on record, so the claim can be retried.
        assert!(
            ProductRepository::claim_approval(&store, product.id, company, role)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn set_published_stores_external_id_and_clears_image() {
        let store = InMemoryStore::new();
        let product = ProductRepository::create(&store, new_product(CompanyId::new(1)))
            .await
            .unwrap();

        let published = store.set_published(product.id, "PARI-42").await.unwrap();
        assert_eq!(published.pari_product_id.as_deref(), Some("PARI-42"));
        assert!(published.image.is_empty());
        assert!(published.tmp_image_path.is_empty());

        let by_pari = store.get_by_pari_id("PARI-42").await.unwrap().unwrap();
        assert_eq!(by_pari.id, product.id);
    }

    #[tokio::test]
    async fn racing_decrements_cannot_overdraw() {
        let store = InMemoryStore::new();
        let product = ProductRepository::create(&store, new_product(CompanyId::new(1)))
            .await
            .unwrap();
        store.set_published(product.id, "PARI-9").await.unwrap();

        // Stock starts at 500; only one 300-unit decrement can fit.
        let (a, b) = tokio::join!(
            store.decrement_quantity("PARI-9", 300),
            store.decrement_quantity("PARI-9", 300),
        );
        let hits = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|p| p.is_some())
            .count();
        assert_eq!(hits, 1);

        let stored = ProductRepository::get(&store, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 200);

        assert!(store.decrement_quantity("PARI-404", 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn summary_partitions_by_status() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        for status in [
            SubjectStatus::Processing,
            SubjectStatus::Processing,
            SubjectStatus::Approved,
            SubjectStatus::Rejected,
        ] {
            let mut product = new_product(company);
            product.status = status;
            ProductRepository::create(&store, product).await.unwrap();
        }
        // A different company's products stay out of the summary.
        ProductRepository::create(&store, new_product(CompanyId::new(2)))
            .await
            .unwrap();

        let summary = ProductRepository::summary(&store, company).await.unwrap();
        assert_eq!(summary.all, 4);
        assert_eq!(summary.processing, 2);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.rejected, 1);
        assert!(summary.is_partition());
    }

    #[tokio::test]
    async fn list_by_filters_and_pages() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        for i in 0..5 {
            let mut product = new_product(company);
            product.name = format!("Batch {i}");
            ProductRepository::create(&store, product).await.unwrap();
        }

        let filter = ProductFilter {
            company_id: company,
            status: None,
            commodity: None,
            search: Some("batch".to_string()),
        };
        let page1 = ProductRepository::list_by(&store, &filter, Page::new(1, 2))
            .await
            .unwrap();
        let page3 = ProductRepository::list_by(&store, &filter, Page::new(3, 2))
            .await
            .unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].name, "Batch 0");
        assert_eq!(page3.len(), 1);
        assert_eq!(ProductRepository::count_by(&store, &filter).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn pre_order_claim_mirrors_product_claim() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let role = seed_verificators(&store, company, 2).await;
        let order = PreOrderRepository::create(
            &store,
            NewPreOrder {
                pari_product_id: "PARI-7".to_string(),
                pari_transaction_id: "TRX-1".to_string(),
                product_id: ProductId::new(1),
                company_id: company,
                quantity: 10,
                status: SubjectStatus::Processing,
                actual_price: 45_000.0,
                buyer_name: "Budi".to_string(),
                buyer_address: "Jakarta".to_string(),
                buyer_contact: "0800".to_string(),
            },
        )
        .await
        .unwrap();

        PreOrderApprovalRepository::record(&store, order.id, UserId::new(100), company)
            .await
            .unwrap();
        assert!(
            !PreOrderRepository::claim_approval(&store, order.id, company, role)
                .await
                .unwrap()
        );

        PreOrderApprovalRepository::record(&store, order.id, UserId::new(101), company)
            .await
            .unwrap();
        assert!(
            PreOrderRepository::claim_approval(&store, order.id, company, role)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn pre_order_get_joins_product_fields() {
        let store = InMemoryStore::new();
        let company = CompanyId::new(1);
        let product = ProductRepository::create(&store, new_product(company))
            .await
            .unwrap();
        let order = PreOrderRepository::create(
            &store,
            NewPreOrder {
                pari_product_id: "PARI-7".to_string(),
                pari_transaction_id: "TRX-2".to_string(),
                product_id: product.id,
                company_id: company,
                quantity: 10,
                status: SubjectStatus::Processing,
                actual_price: 45_000.0,
                buyer_name: "Sari".to_string(),
                buyer_address: "Bandung".to_string(),
                buyer_contact: "0800".to_string(),
            },
        )
        .await
        .unwrap();

        let fetched = PreOrderRepository::get(&store, order.id).await.unwrap().unwrap();
        assert_eq!(fetched.product_name.as_deref(), Some("Robusta beans"));
        assert_eq!(fetched.product_commodity.as_deref(), Some("coffee"));
    }
}
