//! Service entry point: configuration, database pool and migrations,
//! dependency wiring, and the axum server.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use pari_backoffice::api::rest::{AppState, create_router};
use pari_backoffice::application::services::{
    AuthService, CompanyService, PolicyService, PreOrderService, ProductService, RoleService,
    UserService,
};
use pari_backoffice::config::Settings;
use pari_backoffice::infrastructure::auth::{JwtCodec, ServiceKeyIssuer};
use pari_backoffice::infrastructure::marketplace::{MarketplaceApi, PariClient};
use pari_backoffice::infrastructure::persistence::postgres::{
    PostgresCompanyRepository, PostgresGiroRepository, PostgresPolicyRepository,
    PostgresPreOrderApprovalRepository, PostgresPreOrderRepository,
    PostgresProductApprovalRepository, PostgresProductRepository, PostgresRoleRepository,
    PostgresUserRepository,
};
use pari_backoffice::infrastructure::storage::ImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to Postgres")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let roles = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let companies = Arc::new(PostgresCompanyRepository::new(pool.clone()));
    let giros = Arc::new(PostgresGiroRepository::new(pool.clone()));
    let products = Arc::new(PostgresProductRepository::new(pool.clone()));
    let product_approvals = Arc::new(PostgresProductApprovalRepository::new(pool.clone()));
    let pre_orders = Arc::new(PostgresPreOrderRepository::new(pool.clone()));
    let pre_order_approvals = Arc::new(PostgresPreOrderApprovalRepository::new(pool.clone()));
    let policies = Arc::new(PostgresPolicyRepository::new(pool));

    let marketplace: Arc<dyn MarketplaceApi> = Arc::new(
        PariClient::new(
            settings.pari_base_url.clone(),
            settings.pari_api_key.clone(),
            settings.pari_timeout_ms,
        )
        .context("failed to create marketplace client")?,
    );
    let images = ImageStore::new(&settings.upload_dir);

    let policy = PolicyService::new(policies);
    let jwt = JwtCodec::new(&settings.jwt_secret);
    let service_keys = ServiceKeyIssuer::new(
        &settings.service_key_secret,
        settings.service_clients.clone(),
    );

    let state = AppState {
        auth: AuthService::new(
            users.clone(),
            roles.clone(),
            companies.clone(),
            giros,
            policy.clone(),
            jwt.clone(),
            service_keys.clone(),
        ),
        users: UserService::new(users),
        roles: RoleService::new(roles.clone()),
        companies: CompanyService::new(companies),
        products: ProductService::new(
            products.clone(),
            product_approvals,
            roles.clone(),
            marketplace,
            images,
        ),
        pre_orders: PreOrderService::new(pre_orders, pre_order_approvals, products, roles),
        policy,
        jwt,
        service_keys,
    };

    let router = create_router(state, &settings.upload_dir, &settings.allow_origin);

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;
    Ok(())
}
