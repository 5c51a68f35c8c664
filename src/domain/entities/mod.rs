//! # Domain Entities
//!
//! Records representing core back-office concepts.
//!
//! ## Directory
//!
//! - [`User`]: registered user with role and company membership
//! - [`Role`]: named role, defines verification quorums
//! - [`Company`]: tenant owning users, products and pre-orders
//! - [`Giro`]: bank giro lookup record for onboarding
//!
//! ## Catalog & workflow
//!
//! - [`Product`]: verification subject, published to the marketplace on
//!   approval
//! - [`PreOrder`]: verification subject mirroring the product workflow
//! - [`ProductApproval`] / [`PreOrderApproval`]: per-user approval records

pub mod approval;
pub mod company;
pub mod giro;
pub mod pre_order;
pub mod product;
pub mod role;
pub mod user;

pub use approval::{PreOrderApproval, ProductApproval};
pub use company::{Company, NewCompany};
pub use giro::Giro;
pub use pre_order::{NewPreOrder, PreOrder, PreOrderFilter, PreOrderUpdate};
pub use product::{NewProduct, Product, ProductFilter, ProductUpdate, StatusSummary};
pub use role::{NewRole, Role};
pub use user::{NewUser, User, UserUpdate};
