//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use signon_auth::BearerValidator;
use std::sync::Arc;

/// Require a valid bearer token before reaching the inner handler.
///
/// On success the validated claims are inserted into request extensions for
/// handlers to read. Every rejection answers 401 with a bare `Bearer`
/// challenge; the rejection reason reaches the logs, never the client.
pub async fn bearer_auth(
    State(validator): State<Arc<BearerValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let outcome = validator.check(token);
    if !outcome.is_valid() {
        tracing::info!(reason = outcome.reason(), "challenge issued");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
        )
            .into_response();
    }

    if let Some(claims) = outcome.into_claims() {
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}
