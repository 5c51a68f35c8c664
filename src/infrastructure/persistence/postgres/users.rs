//! PostgreSQL implementation of [`UserRepository`].
//!
//! Reads join `roles` and `companies` to fill the denormalized
//! `role_name` / `company_name` display fields.

use crate::domain::entities::{NewUser, User, UserUpdate};
use crate::domain::value_objects::{CompanyId, RoleId, UserId, VerificationLevel};
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, UserRepository,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SELECT_JOINED: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, u.verification_level,
           u.role_id, r.name AS role_name, u.company_id, c.name AS company_name,
           u.must_change_password, u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
    JOIN companies c ON c.id = u.company_id
"#;

fn map_user(row: &PgRow) -> RepositoryResult<User> {
    let level: String = row.try_get("verification_level")?;
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        verification_level: level.parse::<VerificationLevel>()?,
        role_id: RoleId::new(row.try_get("role_id")?),
        role_name: row.try_get("role_name")?,
        company_id: CompanyId::new(row.try_get("company_id")?),
        company_name: row.try_get("company_name")?,
        must_change_password: row.try_get("must_change_password")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL implementation of [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, verification_level,
                               role_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, verification_level,
                      role_id, NULL::text AS role_name, company_id,
                      NULL::text AS company_name, must_change_password,
                      created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.verification_level.as_str())
        .bind(user.role_id.value())
        .bind(user.company_id.value())
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query(&format!("{SELECT_JOINED} ORDER BY u.created_at ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_user).collect()
    }

    async fn get(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(&format!("{SELECT_JOINED} WHERE u.id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(&format!("{SELECT_JOINED} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> RepositoryResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                role_id = COALESCE($4, role_id),
                company_id = COALESCE($5, company_id),
                verification_level = COALESCE($6, verification_level),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, verification_level,
                      role_id, NULL::text AS role_name, company_id,
                      NULL::text AS company_name, must_change_password,
                      created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(update.name)
        .bind(update.email)
        .bind(update.role_id.map(RoleId::value))
        .bind(update.company_id.map(CompanyId::value))
        .bind(update.verification_level.map(VerificationLevel::as_str))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("User", id.to_string()))?;

        map_user(&row)
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<User> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, must_change_password = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, verification_level,
                      role_id, NULL::text AS role_name, company_id,
                      NULL::text AS company_name, must_change_password,
                      created_at, updated_at
            "#,
        )
        .bind(id.value())
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::not_found("User", id.to_string()))?;

        map_user(&row)
    }

    async fn delete(&self, id: UserId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_with_role(
        &self,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE company_id = $1 AND role_id = $2")
                .bind(company_id.value())
                .bind(role_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}
