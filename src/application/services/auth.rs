//! # Auth Service
//!
//! Registration, login, password rotation, giro validation during
//! onboarding, and service-key issuance for marketplace callers.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::policy::PolicyService;
use crate::domain::entities::{Giro, NewUser, User};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CompanyId, UserId, VerificationLevel};
use crate::infrastructure::auth::{IssuedKey, JwtCodec, PasswordHasher, ServiceKeyIssuer};
use crate::infrastructure::persistence::{
    CompanyRepository, GiroRepository, RoleRepository, UserRepository,
};
use serde::Deserialize;
use std::sync::Arc;

/// Registration payload.
///
/// Roles are referenced by name: registration is typically driven from an
/// onboarding flow that knows role names, not ids.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login email. Must be non-empty.
    pub email: String,
    /// Plaintext password, hashed before persistence.
    pub password: String,
    /// Name of the role to assign.
    pub role_name: String,
    /// Owning company.
    pub company_id: CompanyId,
    /// KYC verification level. Defaults to none.
    #[serde(default)]
    pub verification_level: VerificationLevel,
}

/// Successful login: the session token and the user it identifies.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: String,
    /// The authenticated user, with joined display names.
    pub user: User,
}

/// Registration, sessions, and service keys.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    companies: Arc<dyn CompanyRepository>,
    giros: Arc<dyn GiroRepository>,
    policy: PolicyService,
    hasher: PasswordHasher,
    jwt: JwtCodec,
    service_keys: ServiceKeyIssuer,
}

impl AuthService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        companies: Arc<dyn CompanyRepository>,
        giros: Arc<dyn GiroRepository>,
        policy: PolicyService,
        jwt: JwtCodec,
        service_keys: ServiceKeyIssuer,
    ) -> Self {
        Self {
            users,
            roles,
            companies,
            giros,
            policy,
            hasher: PasswordHasher::new(),
            jwt,
            service_keys,
        }
    }

    /// Registers a user: resolves the role by name, verifies the company,
    /// hashes the password, persists, and adds the policy grouping.
    ///
    /// Validation runs before any write, so a rejected request persists
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty fields or unknown role/company,
    /// and `Conflict` when the email is taken.
    pub async fn register(&self, request: RegisterRequest) -> ApplicationResult<User> {
        if request.email.trim().is_empty() {
            return Err(DomainError::empty_field("email").into());
        }
        if request.name.trim().is_empty() {
            return Err(DomainError::empty_field("name").into());
        }
        if request.password.is_empty() {
            return Err(DomainError::empty_field("password").into());
        }

        let role = self
            .roles
            .get_by_name(&request.role_name)
            .await?
            .ok_or_else(|| {
                ApplicationError::validation(format!("unknown role: {}", request.role_name))
            })?;
        self.companies
            .get(request.company_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found("Company", request.company_id.to_string())
            })?;

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                name: request.name,
                email: request.email,
                password_hash,
                verification_level: request.verification_level,
                role_id: role.id,
                company_id: request.company_id,
            })
            .await?;

        self.policy.assign(user.id, &role.name).await?;
        Ok(user)
    }

    /// Registers a batch of users, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first registration error; users registered before it
    /// remain persisted.
    pub async fn register_bulk(
        &self,
        requests: Vec<RegisterRequest>,
    ) -> ApplicationResult<Vec<User>> {
        let mut users = Vec::with_capacity(requests.len());
        for request in requests {
            users.push(self.register(request).await?);
        }
        Ok(users)
    }

    /// Authenticates by email and password and mints a session token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for an unknown email or wrong password; the
    /// two cases are not distinguished.
    pub async fn login(&self, email: &str, password: &str) -> ApplicationResult<LoginOutcome> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(ApplicationError::Unauthorized)?;

        self.hasher.verify(password, &user.password_hash)?;
        let token = self.jwt.issue(&user)?;
        Ok(LoginOutcome { token, user })
    }

    /// Replaces the user's password after verifying the current one, and
    /// clears the `must_change_password` flag.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the current password does not match.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> ApplicationResult<User> {
        if new_password.is_empty() {
            return Err(DomainError::empty_field("password").into());
        }

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User", user_id.to_string()))?;

        self.hasher.verify(current_password, &user.password_hash)?;
        let hash = self.hasher.hash(new_password)?;
        Ok(self.users.update_password(user_id, &hash).await?)
    }

    /// Looks up a giro record by code for onboarding validation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the code is not on record.
    pub async fn validate_giro(&self, code: &str) -> ApplicationResult<Giro> {
        self.giros
            .get_by_code(code)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Giro", code))
    }

    /// Issues a short-lived service key for a configured marketplace client.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for an unknown client or wrong secret.
    pub fn issue_service_key(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> ApplicationResult<IssuedKey> {
        Ok(self.service_keys.issue(client_id, client_secret)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewCompany, NewRole};
    use crate::infrastructure::persistence::{InMemoryStore, PolicyRepository};
    use std::collections::HashMap;

    async fn service_with_store() -> (AuthService, Arc<InMemoryStore>, CompanyId) {
        let store = Arc::new(InMemoryStore::new());
        let role_repo: Arc<dyn RoleRepository> = store.clone();
        role_repo
            .create(NewRole {
                name: "verificator".to_string(),
            })
            .await
            .unwrap();
        let company_repo: Arc<dyn CompanyRepository> = store.clone();
        let company = company_repo
            .create(NewCompany {
                name: "Acme".to_string(),
                code: "ACM".to_string(),
                alias: "acme".to_string(),
                address: String::new(),
                giro: String::new(),
            })
            .await
            .unwrap();

        let mut clients = HashMap::new();
        clients.insert("marketplace".to_string(), "open-sesame".to_string());
        let service = AuthService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            PolicyService::new(store.clone()),
            JwtCodec::new("test-secret"),
            ServiceKeyIssuer::new("service-secret", clients),
        );
        (service, store, company.id)
    }

    fn register_request(email: &str, company_id: CompanyId) -> RegisterRequest {
        RegisterRequest {
            name: "Ayu".to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
            role_name: "verificator".to_string(),
            company_id,
            verification_level: VerificationLevel::None,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let (service, _, company_id) = service_with_store().await;
        let user = service
            .register(register_request("ayu@example.com", company_id))
            .await
            .unwrap();
        assert!(user.must_change_password);

        let outcome = service.login("ayu@example.com", "s3cret").await.unwrap();
        assert_eq!(outcome.user.id, user.id);
        assert!(!outcome.token.is_empty());
    }

    #[tokio::test]
    async fn register_empty_email_persists_nothing() {
        let (service, store, company_id) = service_with_store().await;
        let mut request = register_request("", company_id);
        request.email = "   ".to_string();

        let err = service.register(request).await.unwrap_err();
        assert!(err.is_validation());

        let users: Arc<dyn UserRepository> = store;
        assert_eq!(users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn register_assigns_policy_grouping() {
        let (service, store, company_id) = service_with_store().await;
        let user = service
            .register(register_request("ayu@example.com", company_id))
            .await
            .unwrap();

        let groups = store.groups_of(user.id).await.unwrap();
        assert_eq!(groups, vec!["verificator"]);
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let (service, _, company_id) = service_with_store().await;
        service
            .register(register_request("ayu@example.com", company_id))
            .await
            .unwrap();

        let err = service.login("ayu@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized));
    }

    #[tokio::test]
    async fn change_password_clears_flag() {
        let (service, _, company_id) = service_with_store().await;
        let user = service
            .register(register_request("ayu@example.com", company_id))
            .await
            .unwrap();

        let updated = service
            .change_password(user.id, "s3cret", "n3w-secret")
            .await
            .unwrap();
        assert!(!updated.must_change_password);

        service.login("ayu@example.com", "n3w-secret").await.unwrap();
    }

    #[tokio::test]
    async fn validate_giro_round_trip() {
        let (service, store, _) = service_with_store().await;
        store.seed_giro("0099887766", "PT Kopi Nusantara").await;

        let giro = service.validate_giro("0099887766").await.unwrap();
        assert_eq!(giro.company_name, "PT Kopi Nusantara");

        let err = service.validate_giro("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
