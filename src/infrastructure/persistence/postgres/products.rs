//! PostgreSQL implementation of [`ProductRepository`].
//!
//! The processing→approved transition is a single guarded UPDATE: the status
//! flips only while the row is still `processing` and the approval count has
//! reached the qualifying-user population, so two racing verifications
//! produce exactly one transition.

use crate::domain::entities::{NewProduct, Product, ProductFilter, ProductUpdate, StatusSummary};
use crate::domain::value_objects::{CompanyId, ProductId, RoleId, SubjectStatus};
use crate::infrastructure::persistence::traits::{
    Page, ProductRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const SELECT_COLUMNS: &str = "id, name, description, quantity, unit_quantity, price, unit_price, \
     image, tmp_image_path, status, product_created_at, expired_at, commodity, \
     company_id, is_pre_order, min_price, max_price, pari_product_id, is_active, \
     created_at, updated_at";

fn map_product(row: &PgRow) -> RepositoryResult<Product> {
    let status: String = row.try_get("status")?;
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        quantity: row.try_get("quantity")?,
        unit_quantity: row.try_get("unit_quantity")?,
        price: row.try_get("price")?,
        unit_price: row.try_get("unit_price")?,
        image: row.try_get("image")?,
        tmp_image_path: row.try_get("tmp_image_path")?,
        status: status.parse::<SubjectStatus>()?,
        product_created_at: row.try_get("product_created_at")?,
        expired_at: row.try_get("expired_at")?,
        commodity: row.try_get("commodity")?,
        company_id: CompanyId::new(row.try_get("company_id")?),
        is_pre_order: row.try_get("is_pre_order")?,
        min_price: row.try_get("min_price")?,
        max_price: row.try_get("max_price")?,
        pari_product_id: row.try_get("pari_product_id")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Appends the filter predicates shared by `list_by` and `count_by`.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE company_id = ");
    builder.push_bind(filter.company_id.value());
    if let Some(status) = filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status.as_str());
    }
    if let Some(commodity) = &filter.commodity {
        builder.push(" AND commodity = ");
        builder.push_bind(commodity.clone());
    }
    if let Some(search) = &filter.search {
        builder.push(" AND name ILIKE ");
        builder.push_bind(format!("{search}%"));
    }
}

/// PostgreSQL implementation of [`ProductRepository`].
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: NewProduct) -> RepositoryResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, description, quantity, unit_quantity, price,
                                  unit_price, image, tmp_image_path, status,
                                  product_created_at, expired_at, commodity, company_id,
                                  is_pre_order, min_price, max_price, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(&product.unit_quantity)
        .bind(product.price)
        .bind(&product.unit_price)
        .bind(&product.image)
        .bind(&product.tmp_image_path)
        .bind(product.status.as_str())
        .bind(&product.product_created_at)
        .bind(&product.expired_at)
        .bind(&product.commodity)
        .bind(product.company_id.value())
        .bind(product.is_pre_order)
        .bind(product.min_price)
        .bind(product.max_price)
        .bind(product.is_active)
        .fetch_one(&self.pool)
        .await?;

        map_product(&row)
    }

    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM products ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_product).collect()
    }

    async fn list_by(&self, filter: &ProductFilter, page: Page) -> RepositoryResult<Vec<Product>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {SELECT_COLUMNS} FROM products"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at ASC");
        if let Some(offset) = page.offset() {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(page.size));
            builder.push(" OFFSET ");
            builder.push_bind(offset as i64);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_product).collect()
    }

    async fn get(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    async fn get_by_pari_id(&self, pari_product_id: &str) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE pari_product_id = $1"
        ))
        .bind(pari_product_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    async fn update(&self, id: ProductId, update: ProductUpdate) -> RepositoryResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                quantity = COALESCE($4, quantity),
                price = COALESCE($5, price),
                status = COALESCE($6, status),
                commodity = COALESCE($7, commodity),
                min_price = COALESCE($8, min_price),
                max_price = COALESCE($9, max_price),
                is_active = COALESCE($10, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id.value())
        .bind(update.name)
        .bind(update.description)
        .bind(update.quantity)
        .bind(update.price)
        .bind(update.status.map(SubjectStatus::as_str))
        .bind(update.commodity)
        .bind(update.min_price)
        .bind(update.max_price)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Product", id.to_string()))?;

        map_product(&row)
    }

    async fn decrement_quantity(
        &self,
        pari_product_id: &str,
        quantity: i32,
    ) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE pari_product_id = $1 AND quantity >= $2
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(pari_product_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose()
    }

    async fn delete(&self, id: ProductId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by(&self, filter: &ProductFilter) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn summary(&self, company_id: CompanyId) -> RepositoryResult<StatusSummary> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS all_count,
                   COUNT(*) FILTER (WHERE status = 'processing') AS processing_count,
                   COUNT(*) FILTER (WHERE status = 'approved') AS approved_count,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_count
            FROM products
            WHERE company_id = $1
            "#,
        )
        .bind(company_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(StatusSummary {
            all: row.try_get::<i64, _>("all_count")? as u64,
            processing: row.try_get::<i64, _>("processing_count")? as u64,
            approved: row.try_get::<i64, _>("approved_count")? as u64,
            rejected: row.try_get::<i64, _>("rejected_count")? as u64,
        })
    }

    async fn claim_approval(
        &self,
        id: ProductId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool> {
        // Quorum of zero never qualifies.
        let result = sqlx::query(
            r#"
            UPDATE products p
            SET status = 'approved', updated_at = NOW()
            WHERE p.id = $1
              AND p.status = 'processing'
              AND (SELECT COUNT(*) FROM product_approvals a
                   WHERE a.product_id = p.id AND a.company_id = $2)
                  >= (SELECT COUNT(*) FROM users u
                      WHERE u.company_id = $2 AND u.role_id = $3)
              AND (SELECT COUNT(*) FROM users u
                   WHERE u.company_id = $2 AND u.role_id = $3) > 0
            "#,
        )
        .bind(id.value())
        .bind(company_id.value())
        .bind(role_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_claim(&self, id: ProductId) -> RepositoryResult<()> {
        sqlx::query(
            "UPDATE products SET status = 'processing', updated_at = NOW()
             WHERE id = $1 AND status = 'approved'",
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_published(
        &self,
        id: ProductId,
        pari_product_id: &str,
    ) -> RepositoryResult<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET pari_product_id = $2, image = '', tmp_image_path = '', updated_at = NOW()
            WHERE id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id.value())
        .bind(pari_product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Product", id.to_string()))?;

        map_product(&row)
    }
}
