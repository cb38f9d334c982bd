//! Cross-origin response headers.

use crate::AppState;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY, X_CONTENT_TYPE_OPTIONS,
};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const CROSS_ORIGIN_RESOURCE_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-resource-policy");

const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// Echo allow-listed origins, answer preflights and mark resources embeddable.
pub(crate) async fn apply_cors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .filter(|value| {
            value
                .to_str()
                .is_ok_and(|origin| state.config().is_allowed_origin(origin))
        })
        .cloned();

    let mut response = match &origin {
        Some(_) if request.method() == Method::OPTIONS => preflight(&state),
        _ => next.run(request).await,
    };

    let headers = response.headers_mut();
    if let Some(origin) = origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.append(VARY, HeaderValue::from_static("origin"));
    }
    headers.insert(
        CROSS_ORIGIN_RESOURCE_POLICY,
        HeaderValue::from_static("cross-origin"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}

fn preflight(state: &AppState) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    let allow_headers = format!("content-type, {}", state.config().api_key_header());
    match HeaderValue::from_str(&allow_headers) {
        Ok(value) => {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
        }
        Err(e) => tracing::warn!(error = %e, "API key header name is not a valid header value"),
    }
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("600"));

    response
}
