use axum::{extract::State, Extension};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::models::{LogFilter, LogListResponse};
use crate::AppState;

pub async fn get_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Query(filter): Query<LogFilter>,
) -> Result<Json<LogListResponse>, ApiError> {
    let response = state.audit_service.query(actor, filter).await?;
    Ok(Json(response))
}
