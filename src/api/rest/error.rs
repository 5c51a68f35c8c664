//! Application-to-HTTP error mapping.
//!
//! Every handler returns [`ApiResult`]; the [`IntoResponse`] impl here is
//! the single place deciding which status an [`ApplicationError`] becomes.
//! Error bodies use the same envelope as successes, with `data` omitted.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::application::ApplicationError;

/// Error wrapper giving [`ApplicationError`] an HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApplicationError::Domain(_) | ApplicationError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApplicationError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApplicationError::Forbidden => StatusCode::FORBIDDEN,
            ApplicationError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApplicationError::Conflict(_) => StatusCode::CONFLICT,
            ApplicationError::Marketplace(_) => StatusCode::BAD_GATEWAY,
            ApplicationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(json!({
                "status": status.as_u16().to_string(),
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Shorthand for a handler-level validation rejection.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError(ApplicationError::validation(message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let response = ApiError(ApplicationError::validation("empty name")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError(ApplicationError::not_found("Product", "9")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = ApiError(ApplicationError::forbidden()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
