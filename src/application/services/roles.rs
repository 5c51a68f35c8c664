//! # Role Service

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{NewRole, Role};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::RoleId;
use crate::infrastructure::persistence::RoleRepository;
use std::sync::Arc;

/// Role administration.
#[derive(Debug, Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    /// Creates the service.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// Creates a role.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name and `Conflict` when the
    /// name is taken.
    pub async fn create(&self, name: &str) -> ApplicationResult<Role> {
        if name.trim().is_empty() {
            return Err(DomainError::empty_field("name").into());
        }
        Ok(self
            .roles
            .create(NewRole {
                name: name.to_string(),
            })
            .await?)
    }

    /// Lists all roles.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list(&self) -> ApplicationResult<Vec<Role>> {
        Ok(self.roles.list().await?)
    }

    /// Gets a role by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the role does not exist.
    pub async fn get(&self, id: RoleId) -> ApplicationResult<Role> {
        self.roles
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", id.to_string()))
    }

    /// Renames a role.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name and `NotFound` when the
    /// role does not exist.
    pub async fn update(&self, id: RoleId, name: &str) -> ApplicationResult<Role> {
        if name.trim().is_empty() {
            return Err(DomainError::empty_field("name").into());
        }
        Ok(self.roles.update(id, name).await?)
    }

    /// Deletes a role.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row was removed.
    pub async fn delete(&self, id: RoleId) -> ApplicationResult<()> {
        if self.roles.delete(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("Role", id.to_string()))
        }
    }
}
