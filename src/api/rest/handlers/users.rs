//! User directory endpoints.
//!
//! All routes here sit behind the session guard; reads and writes are
//! additionally policy-checked against the caller's role groups.

use axum::extract::{Extension, Path, State};
use axum::{Json, response::Response};
use serde::Deserialize;

use crate::api::rest::error::ApiResult;
use crate::api::rest::response::success;
use crate::api::rest::state::AppState;
use crate::domain::entities::UserUpdate;
use crate::domain::value_objects::{CompanyId, RoleId, UserId, VerificationLevel};
use crate::infrastructure::auth::Claims;

const REPORT: &str = "report";

#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
    role_id: Option<i64>,
    company_id: Option<i64>,
    verification_level: Option<VerificationLevel>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            role_id: request.role_id.map(RoleId::new),
            company_id: request.company_id.map(CompanyId::new),
            verification_level: request.verification_level,
        }
    }
}

/// `GET /api/v1/user`
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Response> {
    state
        .policy
        .enforce(UserId::new(claims.sub), REPORT, "read")
        .await?;
    Ok(success(state.users.list().await?))
}

/// `GET /api/v1/user/{id}`
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    state
        .policy
        .enforce(UserId::new(claims.sub), REPORT, "read")
        .await?;
    Ok(success(state.users.get(UserId::new(id)).await?))
}

/// `PUT /api/v1/user/{id}`
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Response> {
    state
        .policy
        .enforce(UserId::new(claims.sub), REPORT, "write")
        .await?;
    let user = state.users.update(UserId::new(id), request.into()).await?;
    Ok(success(user))
}

/// `DELETE /api/v1/user/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    state
        .policy
        .enforce(UserId::new(claims.sub), REPORT, "write")
        .await?;
    state.users.delete(UserId::new(id)).await?;
    Ok(success(()))
}
