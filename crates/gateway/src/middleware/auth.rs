//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use common::AppError;

use crate::state::AppState;

/// Verify the bearer token and attach the caller's `Identity` to the request.
///
/// Role checks stay with each operation; this layer only decides whether a
/// usable identity was presented.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state
        .services
        .guard()
        .authenticate(bearer_header(request.headers()))
        .inspect_err(|e| tracing::debug!(error = %e, "Rejected request credentials"))?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Raw `Authorization` header value, if present and valid UTF-8.
pub fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}
