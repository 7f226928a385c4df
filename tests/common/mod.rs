use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use hr_backend::{api_router, config::Settings, database, AppState};

/// Create a test application instance against the PostgreSQL pointed to by
/// DATABASE_URL. Returns None when DATABASE_URL is not set so tests can skip.
pub async fn create_test_app() -> Option<Router> {
    let db_url = std::env::var("DATABASE_URL").ok()?;

    let settings = Settings {
        database_url: db_url.clone(),
        listen_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["*".to_string()],
        jwt_secret: "integration-test-secret".to_string(),
        token_expiry_hours: 8,
        log_level: "ERROR".to_string(),
        log_format: "plain".to_string(),
    };

    let pool = database::create_connection_pool(&db_url)
        .await
        .expect("Failed to create database pool");

    let app_state = AppState::new_with_pool(settings, pool)
        .await
        .expect("Failed to create test app state");

    Some(api_router(app_state))
}

/// Issue a JSON request against the router and return status plus parsed body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Register a fresh organisation with a unique email; returns (token, org_id).
pub async fn register_org(app: &Router, org_name: &str) -> (String, i64) {
    let email = format!("admin+{}@example.com", uuid::Uuid::new_v4().simple());

    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "orgName": org_name,
            "email": email,
            "password": "secret1",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

    let token = body["token"].as_str().unwrap().to_string();
    let org_id = body["organisation"]["id"].as_i64().unwrap();
    (token, org_id)
}
