//! In-memory user, role, company and giro repositories.

use super::InMemoryStore;
use crate::domain::entities::{Company, Giro, NewCompany, NewRole, NewUser, Role, User, UserUpdate};
use crate::domain::value_objects::{CompanyId, GiroId, RoleId, UserId};
use crate::infrastructure::persistence::traits::{
    CompanyRepository, GiroRepository, RepositoryError, RepositoryResult, RoleRepository,
    UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;

/// Fills the denormalized display names from the role and company tables.
fn join_user(inner: &super::Inner, user: &User) -> User {
    let mut user = user.clone();
    user.role_name = inner.roles.get(&user.role_id.value()).map(|r| r.name.clone());
    user.company_name = inner
        .companies
        .get(&user.company_id.value())
        .map(|c| c.name.clone());
    user
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::duplicate("User", user.email));
        }

        let id = inner.next_id();
        let now = Utc::now();
        let stored = User {
            id: UserId::new(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            verification_level: user.verification_level,
            role_id: user.role_id,
            role_name: None,
            company_id: user.company_id,
            company_name: None,
            must_change_password: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let inner = self.inner.read().await;
        let mut users: Vec<User> = inner.users.values().map(|u| join_user(&inner, u)).collect();
        users.sort_by_key(|u| (u.created_at, u.id.value()));
        Ok(users)
    }

    async fn get(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id.value()).map(|u| join_user(&inner, u)))
    }

    async fn get_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| join_user(&inner, u)))
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> RepositoryResult<User> {
        let mut inner = self.inner.write().await;
        if let Some(email) = &update.email
            && inner
                .users
                .values()
                .any(|u| u.email == *email && u.id != id)
        {
            return Err(RepositoryError::duplicate("User", email.clone()));
        }

        let user = inner
            .users
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("User", id.to_string()))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(role_id) = update.role_id {
            user.role_id = role_id;
        }
        if let Some(company_id) = update.company_id {
            user.company_id = company_id;
        }
        if let Some(level) = update.verification_level {
            user.verification_level = level;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<User> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("User", id.to_string()))?;

        user.password_hash = password_hash.to_string();
        user.must_change_password = false;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.remove(&id.value()).is_some())
    }

    async fn count_with_role(
        &self,
        company_id: CompanyId,
        role_id: RoleId,
    ) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.qualifying_users(company_id.value(), role_id.value()))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.users.len() as u64)
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn create(&self, role: NewRole) -> RepositoryResult<Role> {
        let mut inner = self.inner.write().await;
        if inner.roles.values().any(|r| r.name == role.name) {
            return Err(RepositoryError::duplicate("Role", role.name));
        }

        let id = inner.next_id();
        let now = Utc::now();
        let stored = Role {
            id: RoleId::new(id),
            name: role.name,
            created_at: now,
            updated_at: now,
        };
        inner.roles.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> RepositoryResult<Vec<Role>> {
        let inner = self.inner.read().await;
        let mut roles: Vec<Role> = inner.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.id.value());
        Ok(roles)
    }

    async fn get(&self, id: RoleId) -> RepositoryResult<Option<Role>> {
        let inner = self.inner.read().await;
        Ok(inner.roles.get(&id.value()).cloned())
    }

    async fn get_by_name(&self, name: &str) -> RepositoryResult<Option<Role>> {
        let inner = self.inner.read().await;
        Ok(inner.roles.values().find(|r| r.name == name).cloned())
    }

    async fn update(&self, id: RoleId, name: &str) -> RepositoryResult<Role> {
        let mut inner = self.inner.write().await;
        let role = inner
            .roles
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("Role", id.to_string()))?;

        role.name = name.to_string();
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    async fn delete(&self, id: RoleId) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.roles.remove(&id.value()).is_some())
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn create(&self, company: NewCompany) -> RepositoryResult<Company> {
        let mut inner = self.inner.write().await;
        if inner
            .companies
            .values()
            .any(|c| c.name == company.name || c.code == company.code)
        {
            return Err(RepositoryError::duplicate("Company", company.name));
        }

        let id = inner.next_id();
        let now = Utc::now();
        let stored = Company {
            id: CompanyId::new(id),
            name: company.name,
            code: company.code,
            alias: company.alias,
            address: company.address,
            giro: company.giro,
            created_at: now,
            updated_at: now,
        };
        inner.companies.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> RepositoryResult<Vec<Company>> {
        let inner = self.inner.read().await;
        let mut companies: Vec<Company> = inner.companies.values().cloned().collect();
        companies.sort_by_key(|c| c.id.value());
        Ok(companies)
    }

    async fn get(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        let inner = self.inner.read().await;
        Ok(inner.companies.get(&id.value()).cloned())
    }

    async fn update(&self, id: CompanyId, company: NewCompany) -> RepositoryResult<Company> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .companies
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("Company", id.to_string()))?;

        stored.name = company.name;
        stored.code = company.code;
        stored.alias = company.alias;
        stored.address = company.address;
        stored.giro = company.giro;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: CompanyId) -> RepositoryResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.companies.remove(&id.value()).is_some())
    }
}

#[async_trait]
impl GiroRepository for InMemoryStore {
    async fn get_by_code(&self, code: &str) -> RepositoryResult<Option<Giro>> {
        let inner = self.inner.read().await;
        Ok(inner.giros.values().find(|g| g.code == code).cloned())
    }

    async fn get(&self, id: GiroId) -> RepositoryResult<Option<Giro>> {
        let inner = self.inner.read().await;
        Ok(inner.giros.get(&id.value()).cloned())
    }
}
