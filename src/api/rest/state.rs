//! Shared handler state.

use crate::application::services::{
    AuthService, CompanyService, PolicyService, PreOrderService, ProductService, RoleService,
    UserService,
};
use crate::infrastructure::auth::{JwtCodec, ServiceKeyIssuer};

/// Everything handlers and middleware need, cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration, login, service keys.
    pub auth: AuthService,
    /// User directory.
    pub users: UserService,
    /// Role administration.
    pub roles: RoleService,
    /// Company administration.
    pub companies: CompanyService,
    /// Catalog and product verification.
    pub products: ProductService,
    /// Pre-orders and their verification.
    pub pre_orders: PreOrderService,
    /// Access-control checks for guarded routes.
    pub policy: PolicyService,
    /// Session token validation.
    pub jwt: JwtCodec,
    /// Service-key validation for open endpoints.
    pub service_keys: ServiceKeyIssuer,
}
