use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::Json;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "orgName", default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (org_name, email, password) = match (&body.org_name, &body.email, &body.password) {
        (Some(org_name), Some(email), Some(password)) => (org_name, email, password),
        _ => {
            return Err(ApiError::validation(
                "Organisation name, email, and password are required",
            ))
        }
    };

    let result = state.auth_service.register(org_name, email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Organisation registered successfully",
            "token": result.token,
            "user": {
                "id": result.user.id,
                "email": result.user.email,
            },
            "organisation": {
                "id": result.organisation.id,
                "name": result.organisation.name,
            },
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = match (&body.email, &body.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::validation("Email and password are required")),
    };

    let result = state.auth_service.login(email, password).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": result.token,
        "user": {
            "id": result.user.id,
            "email": result.user.email,
        },
        "organisation": {
            "id": result.user.organisation_id,
            "name": result.user.organisation_name,
        },
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthContext>,
) -> Json<Value> {
    state.auth_service.logout(actor).await;

    Json(json!({ "message": "Logout successful" }))
}
