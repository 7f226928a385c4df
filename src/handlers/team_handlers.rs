use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::Json;
use crate::models::{AssignRequest, TeamCreate, TeamUpdate, UnassignRequest};
use crate::AppState;

pub async fn list_teams(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
) -> Result<Json<Value>, ApiError> {
    let teams = state.team_service.list(actor).await?;

    Ok(Json(json!({
        "count": teams.len(),
        "teams": teams,
    })))
}

pub async fn get_team(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let team = state.team_service.get(actor, id).await?;
    Ok(Json(serde_json::to_value(team)?))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Json(body): Json<TeamCreate>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let team = state.team_service.create(actor, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Team created successfully",
            "team": team,
        })),
    ))
}

pub async fn update_team(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(body): Json<TeamUpdate>,
) -> Result<Json<Value>, ApiError> {
    let team = state.team_service.update(actor, id, body).await?;

    Ok(Json(json!({
        "message": "Team updated successfully",
        "team": team,
    })))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.team_service.delete(actor, id).await?;

    Ok(Json(json!({ "message": "Team deleted successfully" })))
}

pub async fn assign_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(team_id): Path<i64>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<Value>, ApiError> {
    let ids = body
        .employee_ids
        .or_else(|| body.employee_id.map(|id| vec![id]))
        .unwrap_or_default();

    let assigned = state
        .team_service
        .assign_employees(actor, team_id, &ids)
        .await?;

    Ok(Json(json!({
        "message": format!("{} employee(s) assigned to team successfully", assigned),
        "assigned_count": assigned,
    })))
}

pub async fn unassign_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(team_id): Path<i64>,
    Json(body): Json<UnassignRequest>,
) -> Result<Json<Value>, ApiError> {
    let employee_id = body
        .employee_id
        .ok_or_else(|| ApiError::validation("employeeId is required"))?;

    state
        .team_service
        .unassign_employee(actor, team_id, employee_id)
        .await?;

    Ok(Json(json!({
        "message": "Employee unassigned from team successfully"
    })))
}
