//! # Persistence Layer
//!
//! Repository ports plus the two backends: PostgreSQL for production and a
//! shared in-memory store for tests and local development.

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use in_memory::InMemoryStore;
pub use traits::{
    CompanyRepository, GiroRepository, Page, PolicyRepository, PreOrderApprovalRepository,
    PreOrderRepository, ProductApprovalRepository, ProductRepository, RepositoryError,
    RepositoryResult, RoleRepository, UserRepository,
};
