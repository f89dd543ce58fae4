//! Axum router wiring.
//!
//! Exact-path routes: the organ's functional endpoint (any method) and
//! `/metrics`. Everything else is a 404.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, ops};

pub const METRICS_PATH: &str = "/metrics";

pub fn build_router(state: AppState) -> Router {
    let organ_path = state.organ().path();
    Router::new()
        .route(organ_path, any(organ))
        .route(METRICS_PATH, get(ops::metrics))
        .fallback(not_found)
        .with_state(state)
}

async fn organ(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.organ().handle().await;
    (StatusCode::OK, body)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
