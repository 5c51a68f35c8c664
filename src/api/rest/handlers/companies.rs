//! Company administration endpoints. The service-key company lookup used
//! by the marketplace lives in [`super::open`].

use axum::extract::{Path, State};
use axum::{Json, response::Response};

use crate::api::rest::error::ApiResult;
use crate::api::rest::response::success;
use crate::api::rest::state::AppState;
use crate::domain::entities::NewCompany;
use crate::domain::value_objects::CompanyId;

/// `GET /api/v1/company`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    Ok(success(state.companies.list().await?))
}

/// `POST /api/v1/company`
pub async fn create(
    State(state): State<AppState>,
    Json(company): Json<NewCompany>,
) -> ApiResult<Response> {
    Ok(success(state.companies.create(company).await?))
}

/// `PUT /api/v1/company/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(company): Json<NewCompany>,
) -> ApiResult<Response> {
    Ok(success(
        state.companies.update(CompanyId::new(id), company).await?,
    ))
}

/// `DELETE /api/v1/company/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    state.companies.delete(CompanyId::new(id)).await?;
    Ok(success(()))
}
