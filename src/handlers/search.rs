use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::services::search::{self, SearchOutcome, SearchRequest};
use crate::state::AppState;

/// Structured search endpoint for UI surfaces that bypass the dialogue.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchOutcome>, AppError> {
    let outcome = search::search_all(
        state.catalog.as_ref(),
        &request,
        state.config.search_limit,
    )
    .await;
    Ok(Json(outcome))
}
