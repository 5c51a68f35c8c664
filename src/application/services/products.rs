//! # Product Service
//!
//! Catalog CRUD, the verification quorum workflow, and the marketplace
//! call-outs.
//!
//! Verification is claim-then-publish: the repository's guarded update
//! decides which verification call crosses the quorum, and only that call
//! performs the marketplace publish. A failed publish releases the claim so
//! a later verification retries; the approval records survive, so the retry
//! claims immediately.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{
    NewProduct, Product, ProductFilter, ProductUpdate, StatusSummary,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CompanyId, ProductId, RoleId, SubjectStatus, UserId};
use crate::infrastructure::marketplace::{
    ImageUpload, MarketplaceApi, PariTransaction, PublishProduct,
};
use crate::infrastructure::persistence::{
    Page, ProductApprovalRepository, ProductRepository, RoleRepository,
};
use crate::infrastructure::storage::ImageStore;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Descriptive fields of a product create, alongside the uploaded image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
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
    /// Producer-declared production date.
    pub product_created_at: String,
    /// Producer-declared expiry date.
    pub expired_at: String,
    /// Commodity classification.
    pub commodity: String,
    /// Owning company.
    pub company_id: CompanyId,
    /// Whether the product is sold on pre-order terms.
    #[serde(default)]
    pub is_pre_order: bool,
    /// Lower bound for pre-order negotiation.
    #[serde(default)]
    pub min_price: f64,
    /// Upper bound for pre-order negotiation.
    #[serde(default)]
    pub max_price: f64,
}

/// Verification request: the caller approving the subject plus the
/// qualifying role defining the quorum.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerifyProduct {
    /// Subject product.
    pub product_id: ProductId,
    /// Approving user.
    pub user_id: UserId,
    /// Company scope of the quorum.
    pub company_id: CompanyId,
    /// Qualifying role.
    pub role_id: RoleId,
}

/// A product together with the caller's approval flag.
#[derive(Debug, Clone)]
pub struct VerifiedProduct {
    /// The subject after this verification.
    pub product: Product,
    /// Whether the calling user has approved the product.
    pub is_verified_by_user: bool,
}

/// Detail read: local record overlaid with live marketplace data.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    /// The product, with live name/image when published.
    pub product: Product,
    /// Whether the calling user has approved the product.
    pub is_verified_by_user: bool,
    /// Marketplace transactions recorded against the product.
    pub transactions: Vec<PariTransaction>,
}

/// Catalog and verification operations.
#[derive(Debug, Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    approvals: Arc<dyn ProductApprovalRepository>,
    roles: Arc<dyn RoleRepository>,
    marketplace: Arc<dyn MarketplaceApi>,
    images: ImageStore,
}

impl ProductService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductRepository>,
        approvals: Arc<dyn ProductApprovalRepository>,
        roles: Arc<dyn RoleRepository>,
        marketplace: Arc<dyn MarketplaceApi>,
        images: ImageStore,
    ) -> Self {
        Self {
            products,
            approvals,
            roles,
            marketplace,
            images,
        }
    }

    /// Creates a product from the descriptive fields and the uploaded image.
    ///
    /// The image is stored under a generated name; the product row keeps the
    /// public path and the on-disk path used at publish time.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or an image without an
    /// extension.
    pub async fn create(
        &self,
        fields: CreateProduct,
        image_name: &str,
        image_bytes: &[u8],
    ) -> ApplicationResult<Product> {
        if fields.name.trim().is_empty() {
            return Err(DomainError::empty_field("name").into());
        }

        let stored = self.images.save(image_name, image_bytes).await?;
        let product = self
            .products
            .create(NewProduct {
                name: fields.name,
                description: fields.description,
                quantity: fields.quantity,
                unit_quantity: fields.unit_quantity,
                price: fields.price,
                unit_price: fields.unit_price,
                image: stored.public_path,
                tmp_image_path: stored.disk_path.to_string_lossy().into_owned(),
                status: SubjectStatus::Processing,
                product_created_at: fields.product_created_at,
                expired_at: fields.expired_at,
                commodity: fields.commodity,
                company_id: fields.company_id,
                is_pre_order: fields.is_pre_order,
                min_price: fields.min_price,
                max_price: fields.max_price,
                is_active: true,
            })
            .await?;

        Ok(product)
    }

    /// Lists all products.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list(&self) -> ApplicationResult<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Lists products matching a company-scoped filter, with the total
    /// matching count for the paging envelope.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list_by(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> ApplicationResult<(Vec<Product>, u64)> {
        let products = self.products.list_by(filter, page).await?;
        let total = self.products.count_by(filter).await?;
        Ok((products, total))
    }

    /// Gets a product by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the product does not exist.
    pub async fn get(&self, id: ProductId) -> ApplicationResult<Product> {
        self.products
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Product", id.to_string()))
    }

    /// Applies an ordinary field update. Manual rejection goes through this
    /// path; the processing→approved transition never does.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the product does not exist.
    pub async fn update(&self, id: ProductId, update: ProductUpdate) -> ApplicationResult<Product> {
        Ok(self.products.update(id, update).await?)
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row was removed.
    pub async fn delete(&self, id: ProductId) -> ApplicationResult<()> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("Product", id.to_string()))
        }
    }

    /// Returns per-status counts for one company.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn summary(&self, company_id: CompanyId) -> ApplicationResult<StatusSummary> {
        Ok(self.products.summary(company_id).await?)
    }

    /// Reads a product with live marketplace data overlaid.
    ///
    /// Unpublished products come back as stored, with no marketplace call.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing product and a marketplace error when
    /// the detail call fails.
    pub async fn detail(
        &self,
        id: ProductId,
        user_id: Option<UserId>,
    ) -> ApplicationResult<ProductDetail> {
        let mut product = self.get(id).await?;

        let is_verified_by_user = match user_id {
            Some(user_id) => self.approvals.exists(id, user_id).await?,
            None => false,
        };

        let mut transactions = Vec::new();
        if let Some(pari_id) = product.pari_product_id.clone() {
            let detail = self
                .marketplace
                .product_detail(product.company_id.value(), &pari_id)
                .await?;
            product.name = detail.product_name;
            product.image = detail.images;
            transactions = detail.transactions;
        }

        Ok(ProductDetail {
            product,
            is_verified_by_user,
            transactions,
        })
    }

    /// Records the caller's approval and, when the quorum completes,
    /// publishes the product to the marketplace.
    ///
    /// Only the call that claims the transition publishes. When the publish
    /// fails the claim is released and the error surfaces; the recorded
    /// approvals make the next verification claim immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing product or role, and a marketplace
    /// error when the publish fails.
    pub async fn verify(&self, request: VerifyProduct) -> ApplicationResult<VerifiedProduct> {
        let product = self.get(request.product_id).await?;
        let role = self
            .roles
            .get(request.role_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", request.role_id.to_string()))?;

        self.approvals
            .record(product.id, request.user_id, request.company_id)
            .await?;

        let claimed = self
            .products
            .claim_approval(product.id, request.company_id, role.id)
            .await?;

        let product = if claimed {
            match self.publish(&product).await {
                Ok(published) => published,
                Err(err) => {
                    self.products.release_claim(product.id).await?;
                    return Err(err);
                }
            }
        } else {
            self.get(request.product_id).await?
        };

        Ok(VerifiedProduct {
            product,
            is_verified_by_user: true,
        })
    }

    /// Decrements stock for a marketplace-reported sale.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown external id and a domain error when
    /// the decrement would drive stock negative.
    pub async fn decrement_stock(
        &self,
        pari_product_id: &str,
        quantity: i32,
    ) -> ApplicationResult<Product> {
        if quantity <= 0 {
            return Err(ApplicationError::validation("quantity must be positive"));
        }

        if let Some(product) = self
            .products
            .decrement_quantity(pari_product_id, quantity)
            .await?
        {
            return Ok(product);
        }

        // The guarded decrement refused: either the id is unknown or the
        // stock is short.
        let product = self
            .products
            .get_by_pari_id(pari_product_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Product", pari_product_id))?;

        Err(DomainError::InsufficientStock {
            available: product.quantity,
            requested: quantity,
        }
        .into())
    }

    async fn publish(&self, product: &Product) -> ApplicationResult<Product> {
        let disk_path = Path::new(&product.tmp_image_path);
        let bytes = self.images.read(disk_path).await?;
        let file_name = disk_path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        let created = self
            .marketplace
            .publish_product(
                &PublishProduct {
                    corporate_id: product.company_id.value(),
                    product_name: product.name.clone(),
                    product_commodity: product.commodity.clone(),
                    date_production: product.product_created_at.clone(),
                    expires_date: product.expired_at.clone(),
                    price: product.price,
                    min_price: product.min_price,
                    max_price: product.max_price,
                    is_pre_order: product.is_pre_order,
                    description: product.description.clone(),
                    quantity: product.quantity,
                },
                ImageUpload {
                    file_name,
                    bytes,
                },
            )
            .await?;

        let published = self.products.set_published(product.id, &created.id).await?;

        // The product is live either way; a stale temp file is only noise.
        if let Err(err) = self.images.remove(disk_path).await {
            tracing::warn!(error = %err, product_id = %product.id, "failed to remove upload");
        }

        Ok(published)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUser;
    use crate::domain::value_objects::VerificationLevel;
    use crate::infrastructure::marketplace::{
        MarketplaceError, MarketplaceResult, PariProduct, PariProductDetail,
    };
    use crate::infrastructure::persistence::{InMemoryStore, UserRepository};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use uuid::Uuid;

    #[derive(Debug, Default)]
    struct FakeMarketplace {
        publishes: AtomicU32,
        fail_publish: AtomicBool,
    }

    impl FakeMarketplace {
        fn publish_count(&self) -> u32 {
            self.publishes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketplaceApi for FakeMarketplace {
        async fn publish_product(
            &self,
            request: &PublishProduct,
            _image: ImageUpload,
        ) -> MarketplaceResult<PariProduct> {
            self.publishes.fetch_add(1, Ordering::SeqCst);
            if self.fail_publish.load(Ordering::SeqCst) {
                return Err(MarketplaceError::connection("marketplace down"));
            }
            Ok(PariProduct {
                id: "PARI-1".to_string(),
                product_name: request.product_name.clone(),
                product_commodity: request.product_commodity.clone(),
                images: String::new(),
                price: String::new(),
                corporate_id: request.corporate_id.to_string(),
                status: "1".to_string(),
            })
        }

        async fn product_detail(
            &self,
            corporate_id: i64,
            product_id: &str,
        ) -> MarketplaceResult<PariProductDetail> {
            Ok(PariProductDetail {
                id: product_id.to_string(),
                product_name: "Live name".to_string(),
                product_commodity: "coffee".to_string(),
                images: "https://cdn.example.com/live.jpg".to_string(),
                price: "42000".to_string(),
                corporate_id,
                status: 1,
                transactions: vec![PariTransaction {
                    id_product: product_id.to_string(),
                    id_buyer: "B-1".to_string(),
                    price: "42000".to_string(),
                    quantity: "10".to_string(),
                    status: "1".to_string(),
                }],
            })
        }
    }

    struct Fixture {
        service: ProductService,
        store: Arc<InMemoryStore>,
        marketplace: Arc<FakeMarketplace>,
        company: CompanyId,
        role: RoleId,
    }

    async fn fixture(verificators: usize) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let marketplace = Arc::new(FakeMarketplace::default());
        let images = ImageStore::new(std::env::temp_dir().join(format!("products-{}", Uuid::new_v4())));

        let company = CompanyId::new(1);
        let role = {
            let roles: Arc<dyn RoleRepository> = store.clone();
            roles
                .create(crate::domain::entities::NewRole {
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

        let service = ProductService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            marketplace.clone(),
            images,
        );
        Fixture {
            service,
            store,
            marketplace,
            company,
            role: role.id,
        }
    }

    fn create_fields(company_id: CompanyId) -> CreateProduct {
        CreateProduct {
            name: "Robusta beans".to_string(),
            description: "Grade 1".to_string(),
            quantity: 500,
            unit_quantity: "kg".to_string(),
            price: 40_000.0,
            unit_price: "kg".to_string(),
            product_created_at: "2022-03-01".to_string(),
            expired_at: "2022-09-01".to_string(),
            commodity: "coffee".to_string(),
            company_id,
            is_pre_order: false,
            min_price: 0.0,
            max_price: 0.0,
        }
    }

    fn verify_request(product_id: ProductId, user: i64, fix: &Fixture) -> VerifyProduct {
        VerifyProduct {
            product_id,
            user_id: UserId::new(user),
            company_id: fix.company,
            role_id: fix.role,
        }
    }

    #[tokio::test]
    async fn create_stores_image_under_generated_name() {
        let fix = fixture(0).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();

        assert!(product.image.starts_with("image/"));
        assert!(product.image.ends_with(".jpg"));
        assert!(!product.image.contains("photo"));
        assert!(product.status.is_processing());
    }

    #[tokio::test]
    async fn quorum_of_two_publishes_on_second_verification() {
        let fix = fixture(2).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();

        let first = fix
            .service
            .verify(verify_request(product.id, 100, &fix))
            .await
            .unwrap();
        assert!(first.product.status.is_processing());
        assert_eq!(fix.marketplace.publish_count(), 0);

        let second = fix
            .service
            .verify(verify_request(product.id, 101, &fix))
            .await
            .unwrap();
        assert!(second.product.status.is_approved());
        assert!(second.is_verified_by_user);
        assert_eq!(second.product.pari_product_id.as_deref(), Some("PARI-1"));
        assert!(second.product.image.is_empty());
        assert_eq!(fix.marketplace.publish_count(), 1);
    }

    #[tokio::test]
    async fn same_user_verifying_twice_does_not_reach_quorum() {
        let fix = fixture(2).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();

        for _ in 0..3 {
            let outcome = fix
                .service
                .verify(verify_request(product.id, 100, &fix))
                .await
                .unwrap();
            assert!(outcome.product.status.is_processing());
        }
        assert_eq!(fix.marketplace.publish_count(), 0);
    }

    #[tokio::test]
    async fn failed_publish_releases_claim_and_retries() {
        let fix = fixture(1).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();

        fix.marketplace.fail_publish.store(true, Ordering::SeqCst);
        let err = fix
            .service
            .verify(verify_request(product.id, 100, &fix))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Marketplace(_)));
        assert!(fix.service.get(product.id).await.unwrap().status.is_processing());

        fix.marketplace.fail_publish.store(false, Ordering::SeqCst);
        let outcome = fix
            .service
            .verify(verify_request(product.id, 100, &fix))
            .await
            .unwrap();
        assert!(outcome.product.status.is_approved());
        assert_eq!(fix.marketplace.publish_count(), 2);
    }

    #[tokio::test]
    async fn verify_missing_product_is_not_found() {
        let fix = fixture(1).await;
        let err = fix
            .service
            .verify(verify_request(ProductId::new(999), 100, &fix))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        // The failed verification must not leave an approval behind.
        let approvals: Arc<dyn ProductApprovalRepository> = fix.store.clone();
        assert_eq!(
            approvals
                .count(ProductId::new(999), fix.company)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn detail_overlays_marketplace_data_when_published() {
        let fix = fixture(1).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();
        fix.service
            .verify(verify_request(product.id, 100, &fix))
            .await
            .unwrap();

        let detail = fix
            .service
            .detail(product.id, Some(UserId::new(100)))
            .await
            .unwrap();
        assert_eq!(detail.product.name, "Live name");
        assert_eq!(detail.product.image, "https://cdn.example.com/live.jpg");
        assert_eq!(detail.transactions.len(), 1);
        assert!(detail.is_verified_by_user);

        let other = fix.service.detail(product.id, Some(UserId::new(555))).await.unwrap();
        assert!(!other.is_verified_by_user);
    }

    #[tokio::test]
    async fn detail_of_unpublished_product_skips_marketplace() {
        let fix = fixture(0).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();

        let detail = fix.service.detail(product.id, None).await.unwrap();
        assert_eq!(detail.product.name, "Robusta beans");
        assert!(detail.transactions.is_empty());
    }

    #[tokio::test]
    async fn decrement_stock_rejects_overdraw() {
        let fix = fixture(1).await;
        let product = fix
            .service
            .create(create_fields(fix.company), "photo.jpg", b"fake-jpeg")
            .await
            .unwrap();
        fix.service
            .verify(verify_request(product.id, 100, &fix))
            .await
            .unwrap();

        let updated = fix.service.decrement_stock("PARI-1", 200).await.unwrap();
        assert_eq!(updated.quantity, 300);

        let err = fix.service.decrement_stock("PARI-1", 301).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fix.service.get(product.id).await.unwrap().quantity, 300);
    }
}
