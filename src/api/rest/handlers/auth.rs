//! Registration, login, password rotation, giro validation, and the
//! service-key token endpoint.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::api::rest::error::{ApiError, ApiResult, bad_request};
use crate::api::rest::response::success;
use crate::api::rest::state::AppState;
use crate::application::services::RegisterRequest;
use crate::domain::entities::User;
use crate::domain::value_objects::UserId;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    password: String,
}

/// `POST /api/v1/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let user = state.auth.register(request).await?;
    Ok(success(user))
}

/// `POST /api/v1/register/bulk`
pub async fn register_bulk(
    State(state): State<AppState>,
    Json(requests): Json<Vec<RegisterRequest>>,
) -> ApiResult<Response> {
    let users = state.auth.register_bulk(requests).await?;
    Ok(success(users))
}

/// `POST /api/v1/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let outcome = state.auth.login(&request.email, &request.password).await?;
    Ok(success(LoginResponse {
        token: outcome.token,
        user: outcome.user,
    }))
}

/// `PUT /api/v1/user/change_password/{id}`
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Response> {
    let user = state
        .auth
        .change_password(
            UserId::new(id),
            &request.current_password,
            &request.password,
        )
        .await?;
    Ok(success(user))
}

/// `GET /api/v1/validate_giro/{code}`
pub async fn validate_giro(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let giro = state.auth.validate_giro(&code).await?;
    Ok(success(giro))
}

/// `GET /api/v1/token`
///
/// Marketplace clients authenticate with `CLIENT_KEY` and `SECRET_KEY`
/// headers and receive a short-lived service key.
pub async fn token(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let client_id = header_value(&headers, "CLIENT_KEY")?;
    let client_secret = header_value(&headers, "SECRET_KEY")?;

    let issued = state.auth.issue_service_key(client_id, client_secret)?;
    Ok(success(issued))
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Result<&'h str, ApiError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| bad_request(format!("missing header: {name}")))
}
