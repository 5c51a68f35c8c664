//! PostgreSQL implementation of [`GiroRepository`].

use crate::domain::entities::Giro;
use crate::domain::value_objects::GiroId;
use crate::infrastructure::persistence::traits::{GiroRepository, RepositoryResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

fn map_giro(row: &PgRow) -> RepositoryResult<Giro> {
    Ok(Giro {
        id: GiroId::new(row.try_get("id")?),
        code: row.try_get("code")?,
        company_name: row.try_get("company_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of [`GiroRepository`].
#[derive(Debug, Clone)]
pub struct PostgresGiroRepository {
    pool: PgPool,
}

impl PostgresGiroRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GiroRepository for PostgresGiroRepository {
    async fn get_by_code(&self, code: &str) -> RepositoryResult<Option<Giro>> {
        let row = sqlx::query(
            "SELECT id, code, company_name, created_at, updated_at FROM giros WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_giro).transpose()
    }

    async fn get(&self, id: GiroId) -> RepositoryResult<Option<Giro>> {
        let row = sqlx::query(
            "SELECT id, code, company_name, created_at, updated_at FROM giros WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_giro).transpose()
    }
}
