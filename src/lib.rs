use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    auth::TokenService,
    config::Settings,
    database::DatabasePool,
    middleware::AuthGate,
    repositories::{
        employee_repo::SqlxEmployeeRepository, log_repo::SqlxLogRepository,
        organisation_repo::SqlxOrganisationRepository, team_repo::SqlxTeamRepository,
        user_repo::SqlxUserRepository, EmployeeRepository, LogRepository, OrganisationRepository,
        TeamRepository, UserRepository,
    },
    services::{AuditService, AuthService, EmployeeService, TeamService},
};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db_pool: DatabasePool,
    pub auth_gate: AuthGate,
    pub auth_service: Arc<AuthService>,
    pub employee_service: Arc<EmployeeService>,
    pub team_service: Arc<TeamService>,
    pub audit_service: Arc<AuditService>,
}

impl AppState {
    /// Create new application state with dependency injection
    pub async fn new(settings: Settings) -> Result<Self, crate::error::ApiError> {
        let db_pool = crate::database::create_connection_pool(&settings.database_url).await?;
        Self::new_with_pool(settings, db_pool).await
    }

    /// Create new application state with an existing database pool
    pub async fn new_with_pool(
        settings: Settings,
        db_pool: DatabasePool,
    ) -> Result<Self, crate::error::ApiError> {
        let tokens = Arc::new(TokenService::new(
            &settings.jwt_secret,
            settings.token_expiry_hours,
        ));

        let organisation_repository: Arc<dyn OrganisationRepository> =
            Arc::new(SqlxOrganisationRepository::new(db_pool.clone()));
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqlxUserRepository::new(db_pool.clone()));
        let employee_repository: Arc<dyn EmployeeRepository> =
            Arc::new(SqlxEmployeeRepository::new(db_pool.clone()));
        let team_repository: Arc<dyn TeamRepository> =
            Arc::new(SqlxTeamRepository::new(db_pool.clone()));
        let log_repository: Arc<dyn LogRepository> =
            Arc::new(SqlxLogRepository::new(db_pool.clone()));

        let audit_service = Arc::new(AuditService::new(log_repository));
        let auth_service = Arc::new(AuthService::new(
            organisation_repository,
            user_repository,
            audit_service.clone(),
            tokens.clone(),
        ));
        let employee_service = Arc::new(EmployeeService::new(
            employee_repository.clone(),
            audit_service.clone(),
        ));
        let team_service = Arc::new(TeamService::new(
            team_repository,
            employee_repository,
            audit_service.clone(),
        ));

        Ok(Self {
            settings,
            db_pool,
            auth_gate: AuthGate { tokens },
            auth_service,
            employee_service,
            team_service,
            audit_service,
        })
    }
}

/// Build the full API router: public routes, bearer-protected routes, and
/// the CORS/trace layers.
pub fn api_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/ready", get(handlers::readiness_check))
        .route("/api/auth/register", post(handlers::auth_handlers::register))
        .route("/api/auth/login", post(handlers::auth_handlers::login));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth_handlers::logout))
        // Employee endpoints
        .route(
            "/api/employees",
            get(handlers::employee_handlers::list_employees)
                .post(handlers::employee_handlers::create_employee),
        )
        .route(
            "/api/employees/:id",
            get(handlers::employee_handlers::get_employee)
                .put(handlers::employee_handlers::update_employee)
                .delete(handlers::employee_handlers::delete_employee),
        )
        // Team endpoints
        .route(
            "/api/teams",
            get(handlers::team_handlers::list_teams).post(handlers::team_handlers::create_team),
        )
        .route(
            "/api/teams/:id",
            get(handlers::team_handlers::get_team)
                .put(handlers::team_handlers::update_team)
                .delete(handlers::team_handlers::delete_team),
        )
        .route(
            "/api/teams/:id/assign",
            post(handlers::team_handlers::assign_employees),
        )
        .route(
            "/api/teams/:id/unassign",
            delete(handlers::team_handlers::unassign_employee),
        )
        // Audit log endpoints
        .route("/api/logs", get(handlers::log_handlers::get_logs))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_gate.clone(),
            middleware::require_auth,
        ));

    let cors_layer = middleware::create_cors_layer(state.settings.cors_allow_origins.clone());

    public_routes
        .merge(protected_routes)
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(middleware::logging::create_trace_layer())
        .layer(cors_layer)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": "Route not found",
        })),
    )
}
