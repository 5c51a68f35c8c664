//! # Policy Service
//!
//! Role-based access control over (subject, object, action) triples. The
//! subject of a policy is a role name; users map onto role names through
//! groupings written at registration. Checks read storage on every call, so
//! policy edits apply without a restart.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::PolicyRepository;
use std::sync::Arc;

/// Access-control decisions backed by [`PolicyRepository`].
#[derive(Debug, Clone)]
pub struct PolicyService {
    policies: Arc<dyn PolicyRepository>,
}

impl PolicyService {
    /// Creates the service.
    #[must_use]
    pub fn new(policies: Arc<dyn PolicyRepository>) -> Self {
        Self { policies }
    }

    /// Grants a role permission on an object/action pair.
    ///
    /// # Errors
    ///
    /// Returns an error when the policy store fails.
    pub async fn grant(&self, subject: &str, object: &str, action: &str) -> ApplicationResult<()> {
        self.policies.add_policy(subject, object, action).await?;
        Ok(())
    }

    /// Adds a user to a role-name group.
    ///
    /// # Errors
    ///
    /// Returns an error when the policy store fails.
    pub async fn assign(&self, user_id: UserId, group: &str) -> ApplicationResult<()> {
        self.policies.add_grouping(user_id, group).await?;
        Ok(())
    }

    /// Checks whether any of the user's groups permits the object/action
    /// pair, failing with `Forbidden` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Forbidden` when no group qualifies.
    pub async fn enforce(
        &self,
        user_id: UserId,
        object: &str,
        action: &str,
    ) -> ApplicationResult<()> {
        for group in self.policies.groups_of(user_id).await? {
            if self.policies.has_policy(&group, object, action).await? {
                return Ok(());
            }
        }
        Err(ApplicationError::forbidden())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryStore;

    #[tokio::test]
    async fn enforce_allows_matching_group() {
        let store = Arc::new(InMemoryStore::new());
        let service = PolicyService::new(store);
        let user = UserId::new(1);

        service.grant("admin", "/api/v1/users", "GET").await.unwrap();
        service.assign(user, "admin").await.unwrap();

        service.enforce(user, "/api/v1/users", "GET").await.unwrap();
    }

    #[tokio::test]
    async fn enforce_rejects_without_policy() {
        let store = Arc::new(InMemoryStore::new());
        let service = PolicyService::new(store);
        let user = UserId::new(1);

        service.assign(user, "viewer").await.unwrap();

        let err = service
            .enforce(user, "/api/v1/users", "DELETE")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden));
    }

    #[tokio::test]
    async fn enforce_rejects_unknown_user() {
        let store = Arc::new(InMemoryStore::new());
        let service = PolicyService::new(store);

        let err = service
            .enforce(UserId::new(99), "/api/v1/users", "GET")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden));
    }
}
