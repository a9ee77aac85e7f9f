use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::conversation::{self, ChatReply};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = req.session_id.trim();
    let message = req.message.trim();

    if session_id.is_empty() {
        return Err(AppError::BadRequest("session_id is required".to_string()));
    }
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let reply = conversation::process_message(&state, session_id, message).await?;
    Ok(Json(reply))
}
