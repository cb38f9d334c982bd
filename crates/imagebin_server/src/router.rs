//! Route table and middleware stack.

use crate::access::{origin_gate, require_api_key};
use crate::cors::apply_cors;
use crate::deletion::delete_image;
use crate::logging::log_requests;
use crate::retrieval::serve_image;
use crate::upload::upload_image;
use crate::{ApiError, ApiResponse, AppState};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use imagebin_error::ValidationError;

/// Build the application router.
///
/// Layers run outermost first: request logging, CORS, then the origin gate.
/// Upload and delete additionally require the API key and are subject to
/// the upload size limit.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/image", post(upload_image))
        .route("/image/", delete(missing_filename))
        .route("/image/:filename", delete(delete_image))
        .route_layer(from_fn_with_state(state.clone(), require_api_key))
        .layer(DefaultBodyLimit::max(*state.config().max_upload_bytes()));

    Router::new()
        .route("/", get(health))
        .route("/image/", get(missing_filename))
        .route("/image/:filename", get(serve_image))
        .nest("/api/v1", api)
        .fallback(endpoint_not_found)
        .layer(from_fn_with_state(state.clone(), origin_gate))
        .layer(from_fn_with_state(state.clone(), apply_cors))
        .layer(from_fn(log_requests))
        .with_state(state)
}

async fn health() -> ApiResponse<()> {
    ApiResponse::message(StatusCode::OK, "Server is running")
}

async fn missing_filename() -> ApiError {
    ValidationError::new("No filename provided").into()
}

async fn endpoint_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Endpoint not found")
}
