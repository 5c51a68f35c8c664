//! Pre-order endpoints.
//!
//! The create handler serves both the session route and the open
//! marketplace push; both carry the same JSON body.

use axum::extract::{Path, Query, State};
use axum::{Json, response::Response};
use serde::Deserialize;

use crate::api::rest::error::ApiResult;
use crate::api::rest::handlers::products::ListQuery;
use crate::api::rest::response::{paged, success};
use crate::api::rest::state::AppState;
use crate::application::services::{CreatePreOrder, VerifyPreOrder};
use crate::domain::entities::PreOrderFilter;
use crate::domain::value_objects::{CompanyId, PreOrderId, SubjectStatus};

#[derive(Debug, Deserialize, Default)]
pub struct UpdatePreOrderRequest {
    quantity: Option<i32>,
    status: Option<SubjectStatus>,
    actual_price: Option<f64>,
    buyer_name: Option<String>,
    buyer_address: Option<String>,
    buyer_contact: Option<String>,
}

/// `GET /api/v1/transaction/preorder`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    Ok(success(state.pre_orders.list().await?))
}

/// `GET /api/v1/transaction/preorder/company/{company_id}`
pub async fn list_by(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    let filter = PreOrderFilter {
        company_id: CompanyId::new(company_id),
        status: query.status,
        commodity: query.commodity.clone(),
        search: query.search.clone(),
    };
    let window = query.window();
    let (pre_orders, total) = state.pre_orders.list_by(&filter, window).await?;
    Ok(paged(pre_orders, window, total))
}

/// `POST /api/v1/transaction/preorder` and `POST /api/v1/product/preorder`
/// (service key)
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreatePreOrder>,
) -> ApiResult<Response> {
    Ok(success(state.pre_orders.create(request).await?))
}

/// `GET /api/v1/transaction/preorder/{id}`
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    Ok(success(state.pre_orders.get(PreOrderId::new(id)).await?))
}

/// `GET /api/v1/transaction/preorder/summary/{company_id}`
pub async fn summary(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> ApiResult<Response> {
    Ok(success(
        state.pre_orders.summary(CompanyId::new(company_id)).await?,
    ))
}

/// `PUT /api/v1/transaction/preorder/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePreOrderRequest>,
) -> ApiResult<Response> {
    let update = crate::domain::entities::PreOrderUpdate {
        quantity: request.quantity,
        status: request.status,
        actual_price: request.actual_price,
        buyer_name: request.buyer_name,
        buyer_address: request.buyer_address,
        buyer_contact: request.buyer_contact,
    };
    Ok(success(
        state.pre_orders.update(PreOrderId::new(id), update).await?,
    ))
}

/// `DELETE /api/v1/transaction/preorder/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    state.pre_orders.delete(PreOrderId::new(id)).await?;
    Ok(success(()))
}

/// `POST /api/v1/transaction/preorder/verification`
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyPreOrder>,
) -> ApiResult<Response> {
    let verified = state.pre_orders.verify(request).await?;
    Ok(success(serde_json::json!({
        "pre_order": verified.pre_order,
        "is_verified_by_user": verified.is_verified_by_user,
    })))
}
