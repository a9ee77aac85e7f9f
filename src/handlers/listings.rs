use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{CategoryQuery, ServiceCategory, ServiceRecord};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListingsParams {
    pub limit: Option<i64>,
}

/// Unfiltered browse of one category, newest first.
pub async fn list_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(params): Query<ListingsParams>,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    let category = ServiceCategory::parse(&category)
        .ok_or_else(|| AppError::NotFound(format!("unknown category: {category}")))?;

    let query = CategoryQuery {
        limit: params.limit.unwrap_or(state.config.search_limit).clamp(1, 100),
        ..Default::default()
    };

    let records = state
        .catalog
        .search(category, &query)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(records))
}
