//! PostgreSQL implementation of [`RoleRepository`].

use crate::domain::entities::{NewRole, Role};
use crate::domain::value_objects::RoleId;
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, RoleRepository,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

fn map_role(row: &PgRow) -> RepositoryResult<Role> {
    Ok(Role {
        id: RoleId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of [`RoleRepository`].
#[derive(Debug, Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create(&self, role: NewRole) -> RepositoryResult<Role> {
        let row = sqlx::query(
            "INSERT INTO roles (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&role.name)
        .fetch_one(&self.pool)
        .await?;

        map_role(&row)
    }

    async fn list(&self) -> RepositoryResult<Vec<Role>> {
        let rows = sqlx::query("SELECT id, name, created_at, updated_at FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_role).collect()
    }

    async fn get(&self, id: RoleId) -> RepositoryResult<Option<Role>> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM roles WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_role).transpose()
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Role>> {
        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_role).transpose()
    }

    async fn update(&self, id: RoleId, name: &str) -> RepositoryResult<Role> {
        let row = sqlx::query(
            r#"
            UPDATE roles SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Role", id.to_string()))?;

        map_role(&row)
    }

    async fn delete(&self, id: RoleId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
