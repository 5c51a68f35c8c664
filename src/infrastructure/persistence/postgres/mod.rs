//! # PostgreSQL Persistence
//!
//! sqlx-backed implementations of the repository traits. One file per
//! aggregate; all share a `PgPool` and the error mapping below.

mod approvals;
mod companies;
mod giros;
mod policies;
mod pre_orders;
mod products;
mod roles;
mod users;

pub use approvals::{PostgresPreOrderApprovalRepository, PostgresProductApprovalRepository};
pub use companies::PostgresCompanyRepository;
pub use giros::PostgresGiroRepository;
pub use policies::PostgresPolicyRepository;
pub use pre_orders::PostgresPreOrderRepository;
pub use products::PostgresProductRepository;
pub use roles::PostgresRoleRepository;
pub use users::PostgresUserRepository;

use crate::domain::value_objects::ParseEnumError;
use crate::infrastructure::persistence::RepositoryError;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepositoryError::not_found("row", "unknown"),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                RepositoryError::duplicate("row", db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepositoryError::connection(err.to_string())
            }
            _ => RepositoryError::query(err.to_string()),
        }
    }
}

impl From<ParseEnumError> for RepositoryError {
    fn from(err: ParseEnumError) -> Self {
        RepositoryError::internal(err.to_string())
    }
}
