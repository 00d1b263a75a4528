//! Axum router configuration

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::handlers::{get_transcript, health_check, post_transcript, stream_transcript};

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/transcript", get(get_transcript).post(post_transcript))
        .route("/transcript/stream", get(stream_transcript))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
