//! Response envelopes.
//!
//! Every endpoint wraps its payload in `{status, message, data}`; paged
//! listings add `page`, `size`, and `total`. The status field mirrors the
//! HTTP status as a string, which is what the back-office frontend expects.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::infrastructure::persistence::Page;

/// Standard JSON envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// HTTP status as a string.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// Payload.
    pub data: T,
}

/// Envelope for paged listings.
#[derive(Debug, Serialize)]
pub struct PagedEnvelope<T> {
    /// HTTP status as a string.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// The page of items.
    pub data: T,
    /// 1-based page number; 0 when unpaged.
    pub page: u32,
    /// Page size; 0 when unpaged.
    pub size: u32,
    /// Total matching items across all pages.
    pub total: u64,
}

/// Wraps a payload in the success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "200".to_string(),
            message: "Success".to_string(),
            data,
        }),
    )
        .into_response()
}

/// Wraps a page of items in the paged success envelope.
pub fn paged<T: Serialize>(data: T, page: Page, total: u64) -> Response {
    (
        StatusCode::OK,
        Json(PagedEnvelope {
            status: "200".to_string(),
            message: "Success".to_string(),
            data,
            page: page.page,
            size: page.size,
            total,
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let envelope = Envelope {
            status: "200".to_string(),
            message: "Success".to_string(),
            data: vec![1, 2, 3],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "200");
        assert_eq!(json["data"][2], 3);
    }

    #[test]
    fn paged_envelope_carries_counts() {
        let envelope = PagedEnvelope {
            status: "200".to_string(),
            message: "Success".to_string(),
            data: Vec::<i32>::new(),
            page: 2,
            size: 10,
            total: 37,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["page"], 2);
        assert_eq!(json["total"], 37);
    }
}
