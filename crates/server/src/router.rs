//! HTTP router construction.
//!
//! Assembles all Axum routes and middleware into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::api;
use crate::session::{session_layer, SESSION_HEADER};
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health))
        // Summaries
        .route("/summarize", get(api::summarize_page))
        .route("/summarize/process", post(api::summarize_process))
        .route("/summarize/history", get(api::summarize_history))
        .route("/summarize/view/{id}", get(api::summarize_view))
        .route("/summarize/key-points", post(api::summarize_key_points))
        .route("/summarize/categorize", post(api::summarize_categorize))
        // Quizzes
        .route("/quiz", get(api::quiz_page))
        .route("/quiz/generate", post(api::quiz_generate))
        .route("/quiz/submit", post(api::quiz_submit))
        .route("/quiz/view/{id}", get(api::quiz_view))
        // Explanations
        .route("/explain", get(api::explain_page))
        .route("/explain/process", post(api::explain_process))
        .route("/explain/view/{id}", get(api::explain_view))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([SESSION_HEADER]),
        Err(e) => {
            warn!("Invalid CORS_ORIGIN '{}': {} — falling back to permissive CORS", origin, e);
            CorsLayer::permissive()
        }
    }
}
