//! In-memory policy repository.

use super::InMemoryStore;
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{PolicyRepository, RepositoryResult};
use async_trait::async_trait;

#[async_trait]
impl PolicyRepository for InMemoryStore {
    async fn add_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
    ) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.policies.insert((
            subject.to_string(),
            object.to_string(),
            action.to_string(),
        )))
    }

    async fn has_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
    ) -> RepositoryResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.policies.contains(&(
            subject.to_string(),
            object.to_string(),
            action.to_string(),
        )))
    }

    async fn add_grouping(&self, user_id: UserId, group: &str) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.groupings.insert((user_id.value(), group.to_string())))
    }

    async fn groups_of(&self, user_id: UserId) -> RepositoryResult<Vec<String>> {
        let inner = self.inner.read().await;
        let mut groups: Vec<String> = inner
            .groupings
            .iter()
            .filter(|(id, _)| *id == user_id.value())
            .map(|(_, group)| group.clone())
            .collect();
        groups.sort();
        Ok(groups)
    }
}
