//! PostgreSQL implementation of [`PreOrderRepository`].
//!
//! Joined reads pull display fields off the referenced product; the
//! commodity filter applies to the joined product row.

use crate::domain::entities::{NewPreOrder, PreOrder, PreOrderFilter, PreOrderUpdate, StatusSummary};
use crate::domain::value_objects::{CompanyId, PreOrderId, ProductId, RoleId, SubjectStatus};
use crate::infrastructure::persistence::traits::{
    Page, PreOrderRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const SELECT_JOINED: &str = r#"
    SELECT o.id, o.pari_product_id, o.pari_transaction_id, o.product_id, o.company_id,
           o.quantity, o.status, o.actual_price, o.buyer_name, o.buyer_address,
           o.buyer_contact, o.created_at, o.updated_at,
           p.name AS product_name, p.commodity AS product_commodity,
           p.image AS product_image, p.min_price AS product_min_price,
           p.max_price AS product_max_price, p.expired_at AS product_expired_at
    FROM pre_orders o
    JOIN products p ON p.id = o.product_id
"#;

const RETURNING_PLAIN: &str = "id, pari_product_id, pari_transaction_id, product_id, company_id, \
     quantity, status, actual_price, buyer_name, buyer_address, buyer_contact, \
     created_at, updated_at, NULL::text AS product_name, NULL::text AS product_commodity, \
     NULL::text AS product_image, NULL::double precision AS product_min_price, \
     NULL::double precision AS product_max_price, NULL::text AS product_expired_at";

fn map_pre_order(row: &PgRow) -> RepositoryResult<PreOrder> {
    let status: String = row.try_get("status")?;
    Ok(PreOrder {
        id: PreOrderId::new(row.try_get("id")?),
        pari_product_id: row.try_get("pari_product_id")?,
        pari_transaction_id: row.try_get("pari_transaction_id")?,
        product_id: ProductId::new(row.try_get("product_id")?),
        company_id: CompanyId::new(row.try_get("company_id")?),
        quantity: row.try_get("quantity")?,
        status: status.parse::<SubjectStatus>()?,
        actual_price: row.try_get("actual_price")?,
        buyer_name: row.try_get("buyer_name")?,
        buyer_address: row.try_get("buyer_address")?,
        buyer_contact: row.try_get("buyer_contact")?,
        product_name: row.try_get("product_name")?,
        product_commodity: row.try_get("product_commodity")?,
        product_image: row.try_get("product_image")?,
        product_min_price: row.try_get("product_min_price")?,
        product_max_price: row.try_get("product_max_price")?,
        product_expired_at: row.try_get("product_expired_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PreOrderFilter) {
    builder.push(" WHERE o.company_id = ");
    builder.push_bind(filter.company_id.value());
    if let Some(status) = filter.status {
        builder.push(" AND o.status = ");
        builder.push_bind(status.as_str());
    }
    if let Some(commodity) = &filter.commodity {
        builder.push(" AND p.commodity = ");
        builder.push_bind(commodity.clone());
    }
    if let Some(search) = &filter.search {
        builder.push(" AND o.buyer_name ILIKE ");
        builder.push_bind(format!("{search}%"));
    }
}

/// PostgreSQL implementation of [`PreOrderRepository`].
#[derive(Debug, Clone)]
pub struct PostgresPreOrderRepository {
    pool: PgPool,
}

impl PostgresPreOrderRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreOrderRepository for PostgresPreOrderRepository {
    async fn create(&self, pre_order: NewPreOrder) -> RepositoryResult<PreOrder> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO pre_orders (pari_product_id, pari_transaction_id, product_id,
                                    company_id, quantity, status, actual_price,
                                    buyer_name, buyer_address, buyer_contact)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RETURNING_PLAIN}
            "#
        ))
        .bind(&pre_order.pari_product_id)
        .bind(&pre_order.pari_transaction_id)
        .bind(pre_order.product_id.value())
        .bind(pre_order.company_id.value())
        .bind(pre_order.quantity)
        .bind(pre_order.status.as_str())
        .bind(pre_order.actual_price)
        .bind(&pre_order.buyer_name)
        .bind(&pre_order.buyer_address)
        .bind(&pre_order.buyer_contact)
        .fetch_one(&self.pool)
        .await?;

        map_pre_order(&row)
    }

    async fn list(&self) -> RepositoryResult<Vec<PreOrder>> {
        let rows = sqlx::query(&format!("{SELECT_JOINED} ORDER BY o.created_at ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_pre_order).collect()
    }

    async fn list_by(
        &self,
        filter: &PreOrderFilter,
        page: Page,
    ) -> RepositoryResult<Vec<PreOrder>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_JOINED);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY o.created_at ASC");
        if let Some(offset) = page.offset() {
            builder.push(" LIMIT ");
            builder.push_bind(i64::from(page.size));
            builder.push(" OFFSET ");
            builder.push_bind(offset as i64);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_pre_order).collect()
    }

    async fn get(&self, id: PreOrderId) -> RepositoryResult<Option<PreOrder>> {
        let row = sqlx::query(&format!("{SELECT_JOINED} WHERE o.id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_pre_order).transpose()
    }

    async fn update(&self, id: PreOrderId, update: PreOrderUpdate) -> RepositoryResult<PreOrder> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE pre_orders
            SET quantity = COALESCE($2, quantity),
                status = COALESCE($3, status),
                actual_price = COALESCE($4, actual_price),
                buyer_name = COALESCE($5, buyer_name),
                buyer_address = COALESCE($6, buyer_address),
                buyer_contact = COALESCE($7, buyer_contact),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RETURNING_PLAIN}
            "#
        ))
        .bind(id.value())
        .bind(update.quantity)
        .bind(update.status.map(SubjectStatus::as_str))
        .bind(update.actual_price)
        .bind(update.buyer_name)
        .bind(update.buyer_address)
        .bind(update.buyer_contact)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("PreOrder", id.to_string()))?;

        map_pre_order(&row)
    }

    async fn delete(&self, id: PreOrderId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM pre_orders WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by(&self, filter: &PreOrderFilter) -> RepositoryResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM pre_orders o JOIN products p ON p.id = o.product_id",
        );
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
            FROM pre_orders
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
        id: PreOrderId,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<bool> {
        // Quorum of zero never qualifies.
        let result = sqlx::query(
            r#"
            UPDATE pre_orders o
            SET status = 'approved', updated_at = NOW()
            WHERE o.id = $1
              AND o.status = 'processing'
              AND (SELECT COUNT(*) FROM pre_order_approvals a
                   WHERE a.pre_order_id = o.id AND a.company_id = $2)
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
}
