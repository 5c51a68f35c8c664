//! Open endpoints called by the PARI Corporate marketplace.
//!
//! These carry a service key in the `Authorization` header instead of a
//! user session: company lookup during buyer onboarding, pre-order pushes,
//! and sale reports that decrement local stock.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{Json, response::Response};
use serde::Deserialize;

use crate::api::rest::error::{ApiError, ApiResult};
use crate::api::rest::middleware::authorize_service_key;
use crate::api::rest::response::success;
use crate::api::rest::state::AppState;
use crate::application::ApplicationError;
use crate::application::services::CreatePreOrder;
use crate::domain::value_objects::CompanyId;

#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pari_product_id: String,
    quantity: i32,
}

/// `GET /api/v1/company/{id}` (service key)
pub async fn company(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    guard(&state, &headers)?;
    Ok(success(state.companies.get(CompanyId::new(id)).await?))
}

/// `POST /api/v1/product/preorder` (service key)
pub async fn pre_order_push(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePreOrder>,
) -> ApiResult<Response> {
    guard(&state, &headers)?;
    Ok(success(state.pre_orders.create(request).await?))
}

/// `POST /api/v1/product/transaction` (service key)
///
/// A marketplace sale report: the product is found by its external id and
/// its stock decremented, rejecting overdrafts.
pub async fn product_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TransactionRequest>,
) -> ApiResult<Response> {
    guard(&state, &headers)?;
    let product = state
        .products
        .decrement_stock(&request.pari_product_id, request.quantity)
        .await?;
    Ok(success(product))
}

fn guard(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    authorize_service_key(state, headers).map_err(|_| ApiError(ApplicationError::Unauthorized))
}
