//! Role administration endpoints.

use axum::extract::{Path, State};
use axum::{Json, response::Response};
use serde::Deserialize;

use crate::api::rest::error::ApiResult;
use crate::api::rest::response::success;
use crate::api::rest::state::AppState;
use crate::domain::value_objects::RoleId;

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    name: String,
}

/// `GET /api/v1/role`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    Ok(success(state.roles.list().await?))
}

/// `POST /api/v1/role`
///
/// New roles get the baseline report read and write policies so their
/// members can use the back office immediately.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<RoleRequest>,
) -> ApiResult<Response> {
    let role = state.roles.create(&request.name).await?;
    state.policy.grant(&role.name, "report", "read").await?;
    state.policy.grant(&role.name, "report", "write").await?;
    Ok(success(role))
}

/// `GET /api/v1/role/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    Ok(success(state.roles.get(RoleId::new(id)).await?))
}

/// `PUT /api/v1/role/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RoleRequest>,
) -> ApiResult<Response> {
    Ok(success(
        state.roles.update(RoleId::new(id), &request.name).await?,
    ))
}

/// `DELETE /api/v1/role/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    state.roles.delete(RoleId::new(id)).await?;
    Ok(success(()))
}
