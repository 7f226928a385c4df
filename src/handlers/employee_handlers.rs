use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::Json;
use crate::models::{EmployeeCreate, EmployeeUpdate};
use crate::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
) -> Result<Json<Value>, ApiError> {
    let employees = state.employee_service.list(actor).await?;

    Ok(Json(json!({
        "count": employees.len(),
        "employees": employees,
    })))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let employee = state.employee_service.get(actor, id).await?;
    Ok(Json(serde_json::to_value(employee)?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Json(body): Json<EmployeeCreate>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let employee = state.employee_service.create(actor, body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Employee created successfully",
            "employee": employee,
        })),
    ))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(body): Json<EmployeeUpdate>,
) -> Result<Json<Value>, ApiError> {
    let employee = state.employee_service.update(actor, id, body).await?;

    Ok(Json(json!({
        "message": "Employee updated successfully",
        "employee": employee,
    })))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.employee_service.delete(actor, id).await?;

    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}
