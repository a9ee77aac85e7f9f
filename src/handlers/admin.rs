use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::db::{queries, seed};
use crate::errors::AppError;
use crate::state::AppState;

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if token.is_empty() || token != state.config.admin_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let db = state.db.lock().unwrap();
    let counts = queries::get_inventory_counts(&db).map_err(AppError::Internal)?;
    let custom_requests = queries::count_custom_requests(&db).map_err(AppError::Internal)?;

    Ok(Json(serde_json::json!({
        "inventory": {
            "jets": counts.jets,
            "empty_legs": counts.empty_legs,
            "helicopters": counts.helicopters,
            "yachts": counts.yachts,
            "cars": counts.cars,
            "adventures": counts.adventures,
        },
        "custom_requests": custom_requests,
    })))
}

pub async fn seed_inventory(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let seeded = {
        let db = state.db.lock().unwrap();
        seed::seed_demo_inventory(&db).map_err(AppError::Internal)?
    };

    Ok(Json(serde_json::json!({ "seeded": seeded })))
}
