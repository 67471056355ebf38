use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

const DEFAULT_SESSION_ID: &str = "default_session";

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub query: Option<String>,
    pub session_id: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let query = payload
        .query
        .ok_or_else(|| ApiError::BadRequest("Query not provided".to_string()))?;
    let session_id = payload
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let response = state.chat.answer(&session_id, &query).await?;
    Ok(Json(json!({ "response": response })))
}
