//! Request guards.
//!
//! Session routes expect `Authorization: Bearer <jwt>`; the verified
//! [`Claims`] are inserted as a request extension for handlers that need
//! the caller's identity. Open endpoints used by the marketplace carry a
//! service key in the `Authorization` header instead and validate it
//! in-handler via [`authorize_service_key`].

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::rest::state::AppState;
use crate::infrastructure::auth::Claims;

/// Validates the bearer session token and exposes its claims.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;
    let claims: Claims = state
        .jwt
        .verify(token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Validates the marketplace service key carried in the `Authorization`
/// header of an open endpoint.
pub fn authorize_service_key(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let key = raw_authorization(headers)?;
    state
        .service_keys
        .validate(key)
        .map(|_| ())
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let token = raw_authorization(headers)?
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?
        .trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(token)
}

fn raw_authorization(headers: &HeaderMap) -> Result<&str, StatusCode> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_str()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}
