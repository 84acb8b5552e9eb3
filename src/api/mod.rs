//! REST API module using Axum
//!
//! Provides the prediction-service HTTP endpoints:
//! - `GET /` — health check and expected feature count
//! - `POST /predict_24h` — failure probability plus recommendation
//! - `GET /sample_payload` — example request payload
//!
//! The router is built by [`create_app`] so tests can drive it in-process
//! via `tower::ServiceExt::oneshot` without binding a port.

pub mod error;
pub mod handlers;

pub use handlers::ApiState;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build a CORS layer that is restrictive by default (same-origin only).
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::get_root))
        .route("/predict_24h", post(handlers::predict_failure_24h))
        .route("/sample_payload", get(handlers::sample_payload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
