//! Wire types for the PARI Corporate marketplace API.
//!
//! The marketplace wraps every response in a `{status, message, data}`
//! envelope and leans on string-typed numerics in several places; these
//! types mirror the wire format as-is, conversions happen in the services.

use serde::{Deserialize, Serialize};

/// Response envelope wrapping every marketplace payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PariEnvelope<T> {
    /// Numeric status code reported by the marketplace.
    pub status: i32,
    /// Human-readable message.
    pub message: String,
    /// Payload.
    pub data: T,
}

/// A product as returned by the create-product call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PariProduct {
    /// Marketplace product identifier.
    pub id: String,
    /// Product name.
    pub product_name: String,
    /// Commodity classification.
    #[serde(default)]
    pub product_commodity: String,
    /// Marketplace-hosted image location.
    #[serde(default)]
    pub images: String,
    /// Price, string-typed on the wire.
    #[serde(default)]
    pub price: String,
    /// Owning corporate identifier.
    #[serde(default)]
    pub corporate_id: String,
    /// Marketplace status.
    #[serde(default)]
    pub status: String,
}

/// A transaction attached to a product detail read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PariTransaction {
    /// Marketplace product identifier.
    pub id_product: String,
    /// Marketplace buyer identifier.
    pub id_buyer: String,
    /// Agreed price, string-typed on the wire.
    pub price: String,
    /// Ordered quantity, string-typed on the wire.
    pub quantity: String,
    /// Transaction status.
    pub status: String,
}

/// A product as returned by the detail-product call, with its transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PariProductDetail {
    /// Marketplace product identifier.
    pub id: String,
    /// Product name.
    pub product_name: String,
    /// Commodity classification.
    #[serde(default)]
    pub product_commodity: String,
    /// Marketplace-hosted image location.
    #[serde(default)]
    pub images: String,
    /// Price, string-typed on the wire.
    #[serde(default)]
    pub price: String,
    /// Owning corporate identifier.
    #[serde(default)]
    pub corporate_id: i64,
    /// Marketplace status.
    #[serde(default)]
    pub status: i32,
    /// Transactions recorded against the product.
    #[serde(default, rename = "transaction")]
    pub transactions: Vec<PariTransaction>,
}

/// Fields submitted with the create-product call.
#[derive(Debug, Clone)]
pub struct PublishProduct {
    /// Owning corporate identifier.
    pub corporate_id: i64,
    /// Product name.
    pub product_name: String,
    /// Commodity classification.
    pub product_commodity: String,
    /// Producer-declared production date.
    pub date_production: String,
    /// Producer-declared expiry date.
    pub expires_date: String,
    /// Asking price, truncated to whole units on the wire.
    pub price: f64,
    /// Pre-order price floor.
    pub min_price: f64,
    /// Pre-order price ceiling.
    pub max_price: f64,
    /// Whether the product is sold on pre-order terms.
    pub is_pre_order: bool,
    /// Free-form description.
    pub description: String,
    /// Stock on hand.
    pub quantity: i32,
}

/// Image payload uploaded with the create-product call.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn envelope_deserializes_created_product() {
        let body = r#"{
            "status": 200,
            "message": "success",
            "data": {
                "id": "PARI-123",
                "product_name": "Robusta beans",
                "price": "40000"
            }
        }"#;

        let envelope: PariEnvelope<PariProduct> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.data.id, "PARI-123");
        assert!(envelope.data.images.is_empty());
    }

    #[test]
    fn detail_defaults_missing_transactions() {
        let body = r#"{
            "status": 200,
            "message": "success",
            "data": {
                "id": "PARI-123",
                "product_name": "Robusta beans"
            }
        }"#;

        let envelope: PariEnvelope<PariProductDetail> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.transactions.is_empty());
    }
}
