//! Router assembly.
//!
//! Three route groups under `/api/v1`: public (register, login, token,
//! roles, companies), session-guarded (users, products, pre-orders), and
//! open marketplace endpoints that validate a service key in-handler.
//! Uploaded images are served statically under `/image`.

use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::rest::handlers::{auth, companies, open, pre_orders, products, roles, users};
use crate::api::rest::middleware;
use crate::api::rest::state::AppState;

/// Builds the full application router.
pub fn create_router(state: AppState, upload_dir: &Path, allow_origin: &str) -> Router {
    let session = axum::middleware::from_fn_with_state(state.clone(), middleware::require_session);

    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/register/bulk", post(auth::register_bulk))
        .route("/login", post(auth::login))
        .route("/validate_giro/{code}", get(auth::validate_giro))
        .route("/token", get(auth::token))
        .route("/role", get(roles::list).post(roles::create))
        .route(
            "/role/{id}",
            get(roles::get).put(roles::update).delete(roles::delete),
        )
        .route("/company", get(companies::list).post(companies::create))
        .route("/company/{id}", put(companies::update))
        .route("/company/{id}", delete(companies::delete));

    let open = Router::new()
        .route("/company/{id}", get(open::company))
        .route("/product/preorder", post(open::pre_order_push))
        .route("/product/transaction", post(open::product_transaction));

    let guarded = Router::new()
        .route("/user", get(users::list))
        .route("/user/change_password/{id}", put(auth::change_password))
        .route(
            "/user/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/product", get(products::list).post(products::create))
        .route("/product/company/{company_id}", get(products::list_by))
        .route("/product/summary/{company_id}", get(products::summary))
        .route("/product/verification", post(products::verify))
        .route(
            "/product/{id}",
            get(products::detail)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/transaction/preorder",
            get(pre_orders::list).post(pre_orders::create),
        )
        .route(
            "/transaction/preorder/company/{company_id}",
            get(pre_orders::list_by),
        )
        .route(
            "/transaction/preorder/summary/{company_id}",
            get(pre_orders::summary),
        )
        .route(
            "/transaction/preorder/verification",
            post(pre_orders::verify),
        )
        .route(
            "/transaction/preorder/{id}",
            get(pre_orders::get)
                .put(pre_orders::update)
                .delete(pre_orders::delete),
        )
        .route_layer(session);

    Router::new()
        .route("/ping", get(ping))
        .nest("/api/v1", public.merge(open).merge(guarded))
        .nest_service("/image", ServeDir::new(upload_dir))
        .layer(cors_layer(allow_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}

fn cors_layer(allow_origin: &str) -> CorsLayer {
    match allow_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(allow_origin, "invalid allow-origin, CORS disabled");
            CorsLayer::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{
        AuthService, CompanyService, PolicyService, PreOrderService, ProductService, RoleService,
        UserService,
    };
    use crate::domain::entities::{NewCompany, NewRole};
    use crate::infrastructure::auth::{JwtCodec, ServiceKeyIssuer};
    use crate::infrastructure::marketplace::{
        ImageUpload, MarketplaceApi, MarketplaceResult, PariProduct, PariProductDetail,
        PublishProduct,
    };
    use crate::infrastructure::persistence::{
        CompanyRepository, InMemoryStore, RoleRepository, UserRepository,
    };
    use crate::infrastructure::storage::ImageStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[derive(Debug, Default)]
    struct FakeMarketplace;

    #[async_trait]
    impl MarketplaceApi for FakeMarketplace {
        async fn publish_product(
            &self,
            request: &PublishProduct,
            _image: ImageUpload,
        ) -> MarketplaceResult<PariProduct> {
            Ok(PariProduct {
                id: "PARI-1".to_string(),
                product_name: request.product_name.clone(),
                product_commodity: request.product_commodity.clone(),
                images: String::new(),
                price: String::new(),
                corporate_id: request.corporate_id.to_string(),
                status: "1".to_string(),
            })
        }

        async fn product_detail(
            &self,
            corporate_id: i64,
            product_id: &str,
        ) -> MarketplaceResult<PariProductDetail> {
            Ok(PariProductDetail {
                id: product_id.to_string(),
                product_name: "live".to_string(),
                product_commodity: String::new(),
                images: String::new(),
                price: String::new(),
                corporate_id,
                status: 1,
                transactions: Vec::new(),
            })
        }
    }

    struct Fixture {
        router: Router,
        store: Arc<InMemoryStore>,
        company_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());

        let roles: Arc<dyn RoleRepository> = store.clone();
        roles
            .create(NewRole {
                name: "verificator".to_string(),
            })
            .await
            .unwrap();
        let companies: Arc<dyn CompanyRepository> = store.clone();
        let company = companies
            .create(NewCompany {
                name: "Acme".to_string(),
                code: "ACM".to_string(),
                alias: "acme".to_string(),
                address: String::new(),
                giro: String::new(),
            })
            .await
            .unwrap();

        let upload_dir = std::env::temp_dir().join(format!("pari-api-{}", uuid::Uuid::new_v4()));
        let images = ImageStore::new(&upload_dir);
        let marketplace: Arc<dyn MarketplaceApi> = Arc::new(FakeMarketplace);

        let policy = PolicyService::new(store.clone());
        let jwt = JwtCodec::new("router-test-secret");
        let mut clients = HashMap::new();
        clients.insert("marketplace".to_string(), "open-sesame".to_string());
        let service_keys = ServiceKeyIssuer::new("service-test-secret", clients);

        let state = AppState {
            auth: AuthService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                policy.clone(),
                jwt.clone(),
                service_keys.clone(),
            ),
            users: UserService::new(store.clone()),
            roles: RoleService::new(store.clone()),
            companies: CompanyService::new(store.clone()),
            products: ProductService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                marketplace,
                images,
            ),
            pre_orders: PreOrderService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            ),
            policy,
            jwt,
            service_keys,
        };

        Fixture {
            router: create_router(state, &upload_dir, "http://localhost:3003"),
            store,
            company_id: company.id.value(),
        }
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ping_pongs() {
        let fix = fixture().await;
        let response = fix
            .router
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "pong");
    }

    #[tokio::test]
    async fn register_with_empty_email_is_rejected_and_persists_nothing() {
        let fix = fixture().await;
        let response = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/register",
                serde_json::json!({
                    "name": "Ayu",
                    "email": "",
                    "password": "secret",
                    "role_name": "verificator",
                    "company_id": fix.company_id,
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let users: Arc<dyn UserRepository> = fix.store.clone();
        assert_eq!(users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn product_routes_require_a_session() {
        let fix = fixture().await;
        let response = fix
            .router
            .oneshot(Request::get("/api/v1/product").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_opens_the_guarded_routes() {
        let fix = fixture().await;
        let register = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/register",
                serde_json::json!({
                    "name": "Ayu",
                    "email": "ayu@example.com",
                    "password": "secret",
                    "role_name": "verificator",
                    "company_id": fix.company_id,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(register.status(), StatusCode::OK);

        let login = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/login",
                serde_json::json!({
                    "email": "ayu@example.com",
                    "password": "secret",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let token = body_json(login).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        let listing = fix
            .router
            .oneshot(
                Request::get("/api/v1/product")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listing.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn role_created_via_api_lets_its_members_administer_users() {
        let fix = fixture().await;
        let created = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/role",
                serde_json::json!({ "name": "admin" }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::OK);

        let register = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/register",
                serde_json::json!({
                    "name": "Dewi",
                    "email": "dewi@example.com",
                    "password": "secret",
                    "role_name": "admin",
                    "company_id": fix.company_id,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(register.status(), StatusCode::OK);
        let user_id = body_json(register).await["data"]["id"].as_i64().unwrap();

        let login = fix
            .router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/login",
                serde_json::json!({
                    "email": "dewi@example.com",
                    "password": "secret",
                }),
            ))
            .await
            .unwrap();
        let token = body_json(login).await["data"]["token"]
            .as_str()
            .unwrap()
            .to_string();

        let listing = fix
            .router
            .clone()
            .oneshot(
                Request::get("/api/v1/user")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(listing.status(), StatusCode::OK);

        let update = fix
            .router
            .oneshot(
                Request::put(format!("/api/v1/user/{user_id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "name": "Dewi Lestari" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(update.status(), StatusCode::OK);
        assert_eq!(body_json(update).await["data"]["name"], "Dewi Lestari");
    }

    #[tokio::test]
    async fn open_company_lookup_requires_a_service_key() {
        let fix = fixture().await;
        let uri = format!("/api/v1/company/{}", fix.company_id);

        let bare = fix
            .router
            .clone()
            .oneshot(Request::get(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bare.status(), StatusCode::UNAUTHORIZED);

        let token = fix
            .router
            .clone()
            .oneshot(
                Request::get("/api/v1/token")
                    .header("CLIENT_KEY", "marketplace")
                    .header("SECRET_KEY", "open-sesame")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(token.status(), StatusCode::OK);
        let key = body_json(token).await["data"]["key"]
            .as_str()
            .unwrap()
            .to_string();

        let authorized = fix
            .router
            .oneshot(
                Request::get(&uri)
                    .header(header::AUTHORIZATION, key)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(authorized.status(), StatusCode::OK);
    }
}
