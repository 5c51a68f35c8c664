//! # Application Services
//!
//! One service per domain concept, composing repositories and adapters.

pub mod auth;
pub mod companies;
pub mod policy;
pub mod pre_orders;
pub mod products;
pub mod roles;
pub mod users;

pub use auth::{AuthService, LoginOutcome, RegisterRequest};
pub use companies::CompanyService;
pub use policy::PolicyService;
pub use pre_orders::{CreatePreOrder, PreOrderService, VerifiedPreOrder, VerifyPreOrder};
pub use products::{
    CreateProduct, ProductDetail, ProductService, VerifiedProduct, VerifyProduct,
};
pub use roles::RoleService;
pub use users::UserService;
