// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Static bearer token authentication.

use crate::error::ApiError;
use crate::handlers::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Check `Authorization: Bearer <token>` against the configured secret.
///
/// Comparison is exact and case-sensitive. Without a configured secret
/// nothing authenticates.
pub fn authenticate(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return false;
    };

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty() && token == secret)
}

/// Middleware rejecting unauthenticated requests with `UNAUTHORIZED`.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if authenticate(request.headers(), state.config.api_secret_key.as_deref()) {
        next.run(request).await
    } else {
        debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        ApiError::Unauthorized.into_response()
    }
}
