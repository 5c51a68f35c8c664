//! # REST API
//!
//! REST endpoints using axum for the back-office frontend and the
//! marketplace integration.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/v1/register` - Register a user
//! - `POST /api/v1/register/bulk` - Register a batch of users
//! - `POST /api/v1/login` - Authenticate and mint a session token
//! - `GET /api/v1/validate_giro/{code}` - Giro lookup during onboarding
//! - `GET /api/v1/token` - Service key for marketplace clients
//!
//! ## Users (session + policy)
//! - `GET /api/v1/user` - List users
//! - `GET /api/v1/user/{id}` - Get user by id
//! - `PUT /api/v1/user/{id}` - Update user
//! - `PUT /api/v1/user/change_password/{id}` - Rotate password
//! - `DELETE /api/v1/user/{id}` - Delete user
//!
//! ## Roles / Companies
//! - CRUD under `/api/v1/role` and `/api/v1/company`
//!
//! ## Products (session)
//! - `GET /api/v1/product` - List products
//! - `GET /api/v1/product/company/{company_id}` - Paged company listing
//! - `POST /api/v1/product` - Create with multipart image upload
//! - `GET /api/v1/product/{id}` - Detail with live marketplace overlay
//! - `GET /api/v1/product/summary/{company_id}` - Per-status counts
//! - `POST /api/v1/product/verification` - Record an approval
//!
//! ## Pre-orders (session)
//! - The same shape under `/api/v1/transaction/preorder`
//!
//! ## Open (service key)
//! - `GET /api/v1/company/{id}` - Company lookup
//! - `POST /api/v1/product/preorder` - Marketplace pre-order push
//! - `POST /api/v1/product/transaction` - Sale report, decrements stock
//!
//! ## Static
//! - `GET /image/*` - Uploaded product images
//! - `GET /ping` - Health check

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use response::{Envelope, PagedEnvelope};
pub use routes::create_router;
pub use state::AppState;
