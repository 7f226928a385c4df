use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{database, error::ApiError, AppState};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Readiness includes a database round trip.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
