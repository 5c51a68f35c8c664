//! # Company Service

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Company, NewCompany};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::CompanyId;
use crate::infrastructure::persistence::CompanyRepository;
use std::sync::Arc;

/// Tenant company administration.
#[derive(Debug, Clone)]
pub struct CompanyService {
    companies: Arc<dyn CompanyRepository>,
}

impl CompanyService {
    /// Creates the service.
    #[must_use]
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty name or code and `Conflict`
    /// when either is taken.
    pub async fn create(&self, company: NewCompany) -> ApplicationResult<Company> {
        if company.name.trim().is_empty() {
            return Err(DomainError::empty_field("name").into());
        }
        if company.code.trim().is_empty() {
            return Err(DomainError::empty_field("code").into());
        }
        Ok(self.companies.create(company).await?)
    }

    /// Lists all companies.
    ///
    /// # Errors
    ///
    /// Returns an error when the store fails.
    pub async fn list(&self) -> ApplicationResult<Vec<Company>> {
        Ok(self.companies.list().await?)
    }

    /// Gets a company by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the company does not exist.
    pub async fn get(&self, id: CompanyId) -> ApplicationResult<Company> {
        self.companies
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Company", id.to_string()))
    }

    /// Replaces the mutable company fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the company does not exist.
    pub async fn update(&self, id: CompanyId, company: NewCompany) -> ApplicationResult<Company> {
        Ok(self.companies.update(id, company).await?)
    }

    /// Deletes a company.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no row was removed.
    pub async fn delete(&self, id: CompanyId) -> ApplicationResult<()> {
        if self.companies.delete(id).await? {
            Ok(())
        } else {
            Err(ApplicationError::not_found("Company", id.to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryStore;

    fn new_company(name: &str, code: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            code: code.to_string(),
            alias: name.to_lowercase(),
            address: "Jl. Sudirman 1".to_string(),
            giro: "0099887766".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_code() {
        let service = CompanyService::new(Arc::new(InMemoryStore::new()));
        let err = service.create(new_company("Acme", " ")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let service = CompanyService::new(Arc::new(InMemoryStore::new()));
        let company = service.create(new_company("Acme", "ACM")).await.unwrap();

        let mut replacement = new_company("Acme Indonesia", "ACM");
        replacement.address = "Jl. Thamrin 2".to_string();
        let updated = service.update(company.id, replacement).await.unwrap();
        assert_eq!(updated.name, "Acme Indonesia");

        service.delete(company.id).await.unwrap();
        assert!(service.get(company.id).await.unwrap_err().is_not_found());
    }
}
