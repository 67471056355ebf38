use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "initialized": true
    }))
}

/// There is nothing to flush; sessions and the index live and die with the
/// process.
pub async fn shutdown(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(250)).await;
        std::process::exit(0);
    });

    Json(json!({"status": "shutting_down"}))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let provider_healthy = state
        .chat
        .provider()
        .health_check()
        .await
        .unwrap_or(false);

    Ok(Json(json!({
        "initialized": true,
        "documents": state.chat.index().len(),
        "sessions": state.chat.history().session_count().await,
        "total_messages": state.chat.history().message_count().await,
        "provider": state.chat.provider().name(),
        "provider_healthy": provider_healthy
    })))
}
