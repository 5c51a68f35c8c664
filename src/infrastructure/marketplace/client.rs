//! # PARI Corporate Client
//!
//! HTTP adapter for the PARI Corporate marketplace. Both endpoints take
//! multipart form bodies and authenticate with a static API key in the
//! `Authorization` header.

use crate::infrastructure::marketplace::dto::{
    ImageUpload, PariEnvelope, PariProduct, PariProductDetail, PublishProduct,
};
use crate::infrastructure::marketplace::error::{MarketplaceError, MarketplaceResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use std::fmt;
use std::time::Duration;

const CREATE_PRODUCT_PATH: &str = "/product/create";
const DETAIL_PRODUCT_PATH: &str = "/product/detail";

/// Port to the PARI Corporate marketplace.
///
/// Services depend on this trait so tests can swap the HTTP adapter for a
/// recording double.
#[async_trait]
pub trait MarketplaceApi: Send + Sync + fmt::Debug {
    /// Publishes an approved product, returning the marketplace record.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketplaceError`] when the call fails or the response
    /// cannot be parsed.
    async fn publish_product(
        &self,
        request: &PublishProduct,
        image: ImageUpload,
    ) -> MarketplaceResult<PariProduct>;

    /// Reads the marketplace detail record for a published product.
    ///
    /// # Errors
    ///
    /// Returns a [`MarketplaceError`] when the call fails or the response
    /// cannot be parsed.
    async fn product_detail(
        &self,
        corporate_id: i64,
        product_id: &str,
    ) -> MarketplaceResult<PariProductDetail>;
}

/// reqwest-backed implementation of [`MarketplaceApi`].
#[derive(Debug, Clone)]
pub struct PariClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PariClient {
    /// Creates a client for the given marketplace base URL and API key.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Internal` if the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_ms: u64,
    ) -> MarketplaceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                MarketplaceError::internal(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn send_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> MarketplaceResult<T> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// Converts the publish request to the wire form. Prices go out as
    /// whole-unit strings, booleans as "0"/"1".
    fn publish_form(request: &PublishProduct) -> Form {
        Form::new()
            .text("corporate_id", request.corporate_id.to_string())
            .text("product_name", request.product_name.clone())
            .text("product_commodity", request.product_commodity.clone())
            .text("date_production", request.date_production.clone())
            .text("expires_date", request.expires_date.clone())
            .text("price", (request.price as i64).to_string())
            .text("minPrice", (request.min_price as i64).to_string())
            .text("maxPrice", (request.max_price as i64).to_string())
            .text("isPreOrder", if request.is_pre_order { "1" } else { "0" })
            .text("status", "1")
            .text("description", request.description.clone())
            .text("quantity", request.quantity.to_string())
    }
}

#[async_trait]
impl MarketplaceApi for PariClient {
    async fn publish_product(
        &self,
        request: &PublishProduct,
        image: ImageUpload,
    ) -> MarketplaceResult<PariProduct> {
        let part = Part::bytes(image.bytes).file_name(image.file_name);
        let form = Self::publish_form(request).part("images", part);

        let envelope: PariEnvelope<PariProduct> =
            self.send_form(CREATE_PRODUCT_PATH, form).await?;
        Ok(envelope.data)
    }

    async fn product_detail(
        &self,
        corporate_id: i64,
        product_id: &str,
    ) -> MarketplaceResult<PariProductDetail> {
        let form = Form::new()
            .text("corporate_id", corporate_id.to_string())
            .text("product_id", product_id.to_string());

        let envelope: PariEnvelope<PariProductDetail> =
            self.send_form(DETAIL_PRODUCT_PATH, form).await?;
        Ok(envelope.data)
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    response: Response,
) -> MarketplaceResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| MarketplaceError::protocol(format!("failed to parse response: {e}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> MarketplaceError {
    if error.is_timeout() {
        MarketplaceError::timeout("request timed out")
    } else if error.is_connect() {
        MarketplaceError::connection(format!("connection failed: {error}"))
    } else {
        MarketplaceError::connection(format!("HTTP request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode, body: &str) -> MarketplaceError {
    match status {
        StatusCode::BAD_REQUEST => MarketplaceError::invalid_request(format!("bad request: {body}")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            MarketplaceError::authentication(format!("authentication failed: {body}"))
        }
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            MarketplaceError::connection(format!("server error ({status}): {body}"))
        }
        _ => MarketplaceError::protocol(format!("HTTP error ({status}): {body}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publish_request() -> PublishProduct {
        PublishProduct {
            corporate_id: 3,
            product_name: "Robusta beans".to_string(),
            product_commodity: "coffee".to_string(),
            date_production: "2022-03-01".to_string(),
            expires_date: "2022-09-01".to_string(),
            price: 40_000.0,
            min_price: 35_000.0,
            max_price: 45_000.0,
            is_pre_order: false,
            description: "Grade 1".to_string(),
            quantity: 500,
        }
    }

    fn image() -> ImageUpload {
        ImageUpload {
            file_name: "robusta.jpg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[tokio::test]
    async fn publish_product_returns_marketplace_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/create"))
            .and(header("Authorization", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 200,
                "message": "success",
                "data": {"id": "PARI-99", "product_name": "Robusta beans"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PariClient::new(server.uri(), "test-key", 5_000).unwrap();
        let product = client
            .publish_product(&publish_request(), image())
            .await
            .unwrap();

        assert_eq!(product.id, "PARI-99");
    }

    #[tokio::test]
    async fn product_detail_parses_transactions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/detail"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 200,
                "message": "success",
                "data": {
                    "id": "PARI-99",
                    "product_name": "Robusta beans",
                    "images": "https://cdn.example.com/p/99.jpg",
                    "transaction": [{
                        "id_product": "PARI-99",
                        "id_buyer": "B-1",
                        "price": "42000",
                        "quantity": "10",
                        "status": "1"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = PariClient::new(server.uri(), "test-key", 5_000).unwrap();
        let detail = client.product_detail(3, "PARI-99").await.unwrap();

        assert_eq!(detail.transactions.len(), 1);
        assert_eq!(detail.transactions[0].quantity, "10");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/detail"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = PariClient::new(server.uri(), "wrong-key", 5_000).unwrap();
        let err = client.product_detail(3, "PARI-99").await.unwrap_err();

        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/product/create"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = PariClient::new(server.uri(), "test-key", 5_000).unwrap();
        let err = client
            .publish_product(&publish_request(), image())
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }
}
