//! Request gates: the origin allow-list and the API key check.

use crate::{ApiError, AppState};
use axum::extract::{Request, State};
use axum::http::header::ORIGIN;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use imagebin_core::IMAGE_ROUTE_PREFIX;
use imagebin_error::{AccessError, AccessErrorKind};

/// Paths reachable from any origin: the health check and image retrieval.
///
/// Browsers often omit `Origin` on `<img>` loads and direct navigation, so
/// images must be served without it.
pub(crate) fn is_origin_exempt(path: &str) -> bool {
    path == "/" || path.starts_with(IMAGE_ROUTE_PREFIX)
}

/// Turn away requests to non-exempt paths unless `Origin` is allow-listed.
///
/// Rejections answer 404 so a disallowed caller cannot tell the endpoint exists.
pub(crate) async fn origin_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_origin_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok());

    match origin {
        Some(origin) if state.config().is_allowed_origin(origin) => next.run(request).await,
        other => {
            let err = AccessError::new(AccessErrorKind::OriginRejected(
                other.unwrap_or("<none>").to_string(),
            ));
            tracing::debug!(
                path = %request.uri().path(),
                error = %err,
                "Origin gate rejected request"
            );
            ApiError::from(err).into_response()
        }
    }
}

/// Require the configured API key header on the routes this layer wraps.
pub(crate) async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.config();
    let supplied = request
        .headers()
        .get(config.api_key_header().as_str())
        .map(|value| value.as_bytes());

    let rejection = match supplied {
        None => Some(AccessErrorKind::MissingApiKey),
        Some(key) if !keys_match(key, config.api_key().as_bytes()) => {
            Some(AccessErrorKind::InvalidApiKey)
        }
        Some(_) => None,
    };

    match rejection {
        None => next.run(request).await,
        Some(kind) => ApiError::from(AccessError::new(kind)).into_response(),
    }
}

/// Compare keys without short-circuiting on the first differing byte.
fn keys_match(supplied: &[u8], expected: &[u8]) -> bool {
    if supplied.len() != expected.len() {
        return false;
    }
    supplied
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
