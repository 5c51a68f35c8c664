//! PostgreSQL implementation of [`PolicyRepository`].

use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{PolicyRepository, RepositoryResult};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of [`PolicyRepository`].
#[derive(Debug, Clone)]
pub struct PostgresPolicyRepository {
    pool: PgPool,
}

impl PostgresPolicyRepository {
    /// Creates a new repository over the shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyRepository for PostgresPolicyRepository {
    async fn add_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
    ) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO policies (subject, object, action)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject, object, action) DO NOTHING
            "#,
        )
        .bind(subject)
        .bind(object)
        .bind(action)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn has_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
    ) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM policies
             WHERE subject = $1 AND object = $2 AND action = $3)",
        )
        .bind(subject)
        .bind(object)
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_grouping(&self, user_id: UserId, group: &str) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO policy_groupings (user_id, group_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, group_name) DO NOTHING
            "#,
        )
        .bind(user_id.value())
        .bind(group)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn groups_of(&self, user_id: UserId) -> RepositoryResult<Vec<String>> {
        let groups: Vec<String> = sqlx::query_scalar(
            "SELECT group_name FROM policy_groupings WHERE user_id = $1 ORDER BY group_name",
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }
}
