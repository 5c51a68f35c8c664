//! PostgreSQL implementation of [`CompanyRepository`].

use crate::domain::entities::{Company, NewCompany};
use crate::domain::value_objects::CompanyId;
use crate::infrastructure::persistence::traits::{
    CompanyRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

fn map_company(row: &PgRow) -> RepositoryResult<Company> {
    Ok(Company {
        id: CompanyId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        code: row.try_get("code")?,
        alias: row.try_get("alias")?,
        address: row.try_get("address")?,
        giro: row.try_get("giro")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of [`CompanyRepository`].
#[derive(Debug, Clone)]
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: NewCompany) -> RepositoryResult<Company> {
        let row = sqlx::query(
            r#"
            INSERT INTO companies (name, code, alias, address, giro)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, code, alias, address, giro, created_at, updated_at
            "#,
        )
        .bind(&company.name)
        .bind(&company.code)
        .bind(&company.alias)
        .bind(&company.address)
        .bind(&company.giro)
        .fetch_one(&self.pool)
        .await?;

        map_company(&row)
    }

    async fn list(&self) -> RepositoryResult<Vec<Company>> {
        let rows = sqlx::query(
            "SELECT id, name, code, alias, address, giro, created_at, updated_at
             FROM companies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_company).collect()
    }

    async fn get(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        let row = sqlx::query(
            "SELECT id, name, code, alias, address, giro, created_at, updated_at
             FROM companies WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_company).transpose()
    }

    async fn update(&self, id: CompanyId, company: NewCompany) -> RepositoryResult<Company> {
        let row = sqlx::query(
            r#"
            UPDATE companies
            SET name = $2, code = $3, alias = $4, address = $5, giro = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, code, alias, address, giro, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(&company.name)
        .bind(&company.code)
        .bind(&company.alias)
        .bind(&company.address)
        .bind(&company.giro)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Company", id.to_string()))?;

        map_company(&row)
    }

    async fn delete(&self, id: CompanyId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
