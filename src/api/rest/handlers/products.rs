//! Catalog endpoints: CRUD, paged company listings, summary counts, and
//! the verification endpoint.
//!
//! Product create is a multipart form: descriptive fields as text parts
//! plus the image under the `file` part.

use axum::extract::{Multipart, Path, Query, State};
use axum::{Json, response::Response};
use serde::Deserialize;
use std::str::FromStr;

use crate::api::rest::error::{ApiError, ApiResult, bad_request};
use crate::api::rest::response::{paged, success};
use crate::api::rest::state::AppState;
use crate::application::services::{CreateProduct, VerifyProduct};
use crate::domain::entities::ProductFilter;
use crate::domain::value_objects::{CompanyId, ProductId, SubjectStatus, UserId};
use crate::infrastructure::persistence::Page;

/// Paging and filter query for company-scoped listings.
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    pub status: Option<SubjectStatus>,
    pub commodity: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn window(&self) -> Page {
        Page::new(self.page, self.size)
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    quantity: Option<i32>,
    price: Option<f64>,
    status: Option<SubjectStatus>,
    commodity: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    is_active: Option<bool>,
}

/// `GET /api/v1/product`
pub async fn list(State(state): State<AppState>) -> ApiResult<Response> {
    Ok(success(state.products.list().await?))
}

/// `GET /api/v1/product/company/{company_id}`
pub async fn list_by(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Response> {
    let filter = ProductFilter {
        company_id: CompanyId::new(company_id),
        status: query.status,
        commodity: query.commodity.clone(),
        search: query.search.clone(),
    };
    let window = query.window();
    let (products, total) = state.products.list_by(&filter, window).await?;
    Ok(paged(products, window, total))
}

/// `POST /api/v1/product` (multipart)
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let (fields, image_name, image_bytes) = read_product_form(multipart).await?;
    let product = state.products.create(fields, &image_name, &image_bytes).await?;
    Ok(success(product))
}

/// `GET /api/v1/product/{id}`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Response> {
    let detail = state
        .products
        .detail(ProductId::new(id), query.user_id.map(UserId::new))
        .await?;

    Ok(success(serde_json::json!({
        "product": detail.product,
        "is_verified_by_user": detail.is_verified_by_user,
        "transaction": detail.transactions,
    })))
}

/// `GET /api/v1/product/summary/{company_id}`
pub async fn summary(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> ApiResult<Response> {
    Ok(success(
        state.products.summary(CompanyId::new(company_id)).await?,
    ))
}

/// `PUT /api/v1/product/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> ApiResult<Response> {
    let update = crate::domain::entities::ProductUpdate {
        name: request.name,
        description: request.description,
        quantity: request.quantity,
        price: request.price,
        status: request.status,
        commodity: request.commodity,
        min_price: request.min_price,
        max_price: request.max_price,
        is_active: request.is_active,
    };
    Ok(success(
        state.products.update(ProductId::new(id), update).await?,
    ))
}

/// `DELETE /api/v1/product/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    state.products.delete(ProductId::new(id)).await?;
    Ok(success(()))
}

/// `POST /api/v1/product/verification`
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyProduct>,
) -> ApiResult<Response> {
    let verified = state.products.verify(request).await?;
    Ok(success(serde_json::json!({
        "product": verified.product,
        "is_verified_by_user": verified.is_verified_by_user,
    })))
}

async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(CreateProduct, String, Vec<u8>), ApiError> {
    let mut text = std::collections::HashMap::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "file" {
            let file_name = field
                .file_name()
                .map_or_else(|| "image".to_string(), str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("failed reading image: {e}")))?;
            image = Some((file_name, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| bad_request(format!("failed reading field {name}: {e}")))?;
            text.insert(name, value);
        }
    }

    let (image_name, image_bytes) = image.ok_or_else(|| bad_request("missing image file"))?;

    let fields = CreateProduct {
        name: take(&mut text, "name"),
        description: take(&mut text, "description"),
        quantity: parse_field(&text, "quantity")?,
        unit_quantity: take(&mut text, "unit_quantity"),
        price: parse_field(&text, "price")?,
        unit_price: take(&mut text, "unit_price"),
        product_created_at: take(&mut text, "product_created_at"),
        expired_at: take(&mut text, "expired_at"),
        commodity: take(&mut text, "commodity"),
        company_id: CompanyId::new(parse_field(&text, "company_id")?),
        is_pre_order: text
            .get("is_pre_order")
            .is_some_and(|v| v == "true" || v == "1"),
        min_price: parse_optional(&text, "min_price")?,
        max_price: parse_optional(&text, "max_price")?,
    };

    Ok((fields, image_name, image_bytes))
}

fn take(text: &mut std::collections::HashMap<String, String>, name: &str) -> String {
    text.remove(name).unwrap_or_default()
}

fn parse_field<T: FromStr>(
    text: &std::collections::HashMap<String, String>,
    name: &str,
) -> Result<T, ApiError> {
    text.get(name)
        .ok_or_else(|| bad_request(format!("missing field: {name}")))?
        .parse()
        .map_err(|_| bad_request(format!("invalid value for field: {name}")))
}

fn parse_optional<T: FromStr + Default>(
    text: &std::collections::HashMap<String, String>,
    name: &str,
) -> Result<T, ApiError> {
    match text.get(name) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|_| bad_request(format!("invalid value for field: {name}"))),
        _ => Ok(T::default()),
    }
}
