//! # User Service
//!
//! Directory reads and ordinary updates. Registration and password changes
//! live in the auth service.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{User, UserUpdate};
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::UserRepository;
use std::sync::Arc;

/// User directory operations.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates the service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Lists all users with joined display names.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list(&self) -> ApplicationResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Gets a user by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user does not exist.
    pub async fn get(&self, id: UserId) -> ApplicationResult<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", id.to_string()))
    }

    /// Applies an ordinary field update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user does not exist and `Conflict` when
    /// a new email is already taken.
    pub async fn update(&self, id: UserId, update: UserUpdate) -> ApplicationResult<User> {
        Ok(self.users.update(id, update).await?)
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row was removed.
    pub async fn delete(&self, id: UserId) -> ApplicationResult<()> {
        if self.users.delete(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("User", id.to_string()))
        }
    }

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn count(&self) -> ApplicationResult<u64> {
        Ok(self.users.count().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUser;
    use crate::domain::value_objects::{CompanyId, RoleId, VerificationLevel};
    use crate::infrastructure::persistence::InMemoryStore;

    async fn seeded() -> (UserService, User) {
        let store = Arc::new(InMemoryStore::new());
        let repo: Arc<dyn UserRepository> = store;
        let user = repo
            .create(NewUser {
                name: "Ayu".to_string(),
                email: "ayu@example.com".to_string(),
                password_hash: "hash".to_string(),
                verification_level: VerificationLevel::None,
                role_id: RoleId::new(1),
                company_id: CompanyId::new(1),
            })
            .await
            .unwrap();
        (UserService::new(repo), user)
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let (service, _) = seeded().await;
        let err = service.get(UserId::new(999)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn update_changes_name() {
        let (service, user) = seeded().await;
        let updated = service
            .update(
                user.id,
                UserUpdate {
                    name: Some("Ayu Lestari".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ayu Lestari");
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (service, user) = seeded().await;
        service.delete(user.id).await.unwrap();
        let err = service.delete(user.id).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
