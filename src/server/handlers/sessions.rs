use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.chat.history().list_sessions().await;
    Ok(Json(json!({ "sessions": sessions })))
}

pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .chat
        .history()
        .session_info(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    let messages: Vec<Value> = state
        .chat
        .history()
        .render(&session_id)
        .await
        .into_iter()
        .map(|turn| {
            json!({
                "role": turn.role,
                "content": turn.content,
                "timestamp": turn.created_at
            })
        })
        .collect();

    Ok(Json(json!({ "session": session, "messages": messages })))
}
