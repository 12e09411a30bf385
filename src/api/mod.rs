//! HTTP surface: `/api/states`, `/api/employments` and `/health`.

pub mod handlers;

use crate::domain::model::StateInfo;
use crate::domain::ports::EmploymentService;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn EmploymentService>,
    pub states: Arc<Vec<StateInfo>>,
}

impl AppState {
    pub fn new(service: Arc<dyn EmploymentService>, states: Vec<StateInfo>) -> Self {
        Self {
            service,
            states: Arc::new(states),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/states", get(handlers::list_states))
        .route("/api/employments", get(handlers::list_employments))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(CatchPanicLayer::custom(internal_failure))
        .with_state(state)
}

/// Unexpected faults surface as a generic 500 instead of a dropped connection.
///
/// Handlers catch their own panics first so the event carries the request
/// span; this layer covers anything that slips past them.
fn internal_failure(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(error = panic_detail(err.as_ref()), "employment.index.failed");
    failure_response()
}

pub(crate) fn panic_detail(err: &(dyn Any + Send)) -> &str {
    err.downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic")
}

pub(crate) fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({ "data": { "message": "Failed to load employment data" } }).to_string(),
    )
        .into_response()
}
