//! PostgreSQL implementations of the approval repositories.
//!
//! Insertion idempotency rides on the unique (subject, user) index:
//! `ON CONFLICT DO NOTHING` makes a repeated approval a no-op, reported
//! through the affected-row count.

use crate::domain::value_objects::{CompanyId, PreOrderId, ProductId, UserId};
use crate::infrastructure::persistence::traits::{
    PreOrderApprovalRepository, ProductApprovalRepository, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of [`ProductApprovalRepository`].
#[derive(Debug, Clone)]
pub struct PostgresProductApprovalRepository {
    pool: PgPool,
}

impl PostgresProductApprovalRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductApprovalRepository for PostgresProductApprovalRepository {
    async fn record(
        &self,
        product_id: ProductId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO product_approvals (product_id, user_id, company_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, user_id) DO NOTHING
            "#,
        )
        .bind(product_id.value())
        .bind(user_id.value())
        .bind(company_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists(&self, product_id: ProductId, user_id: UserId) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM product_approvals
             WHERE product_id = $1 AND user_id = $2)",
        )
        .bind(product_id.value())
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count(&self, product_id: ProductId, company_id: CompanyId) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM product_approvals
             WHERE product_id = $1 AND company_id = $2",
        )
        .bind(product_id.value())
        .bind(company_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }
}

/// PostgreSQL implementation of [`PreOrderApprovalRepository`].
#[derive(Debug, Clone)]
pub struct PostgresPreOrderApprovalRepository {
    pool: PgPool,
}

impl PostgresPreOrderApprovalRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreOrderApprovalRepository for PostgresPreOrderApprovalRepository {
    async fn record(
        &self,
        pre_order_id: PreOrderId,
        user_id: UserId,
        company_id: CompanyId,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO pre_order_approvals (pre_order_id, user_id, company_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (pre_order_id, user_id) DO NOTHING
            "#,
        )
        .bind(pre_order_id.value())
        .bind(user_id.value())
        .bind(company_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn exists(&self, pre_order_id: PreOrderId, user_id: UserId) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM pre_order_approvals
             WHERE pre_order_id = $1 AND user_id = $2)",
        )
        .bind(pre_order_id.value())
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count(
        &self,
        pre_order_id: PreOrderId,
        company_id: CompanyId,
    ) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pre_order_approvals
             WHERE pre_order_id = $1 AND company_id = $2",
        )
        .bind(pre_order_id.value())
        .bind(company_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }
}
