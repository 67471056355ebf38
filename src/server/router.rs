use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, health, sessions};
use crate::state::AppState;

/// Creates the application router: the chat endpoint plus health and
/// session inspection, with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/health", get(health::health))
        .route("/api/status", get(health::get_status))
        .route("/api/shutdown", post(health::shutdown))
        .route("/api/sessions", get(sessions::list_sessions))
        .route(
            "/api/sessions/:session_id/messages",
            get(sessions::get_session_messages),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
