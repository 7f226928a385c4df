use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid reference: {0}")]
    Reference(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unknown error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authentication<T: Into<String>>(msg: T) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return Self::Duplicate(
                        "A record with this information already exists".to_string(),
                    )
                }
                // foreign_key_violation
                Some("23503") => {
                    return Self::Reference("Referenced record does not exist".to_string())
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_kind, message) = match self {
            ApiError::Validation(msg) => {
                tracing::warn!(error = %msg, "validation error");
                (StatusCode::BAD_REQUEST, "Validation error", msg)
            }
            ApiError::Authentication(msg) => {
                tracing::warn!(error = %msg, "authentication failed");
                (StatusCode::UNAUTHORIZED, "Authentication failed", msg)
            }
            ApiError::Unauthenticated(msg) => {
                tracing::warn!(error = %msg, "authentication required");
                (StatusCode::UNAUTHORIZED, "Authentication required", msg)
            }
            ApiError::TokenExpired => {
                tracing::info!("expired token presented");
                (
                    StatusCode::UNAUTHORIZED,
                    "Token expired",
                    "Please login again".to_string(),
                )
            }
            ApiError::InvalidToken => {
                tracing::warn!("invalid token presented");
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid token",
                    "Authentication failed".to_string(),
                )
            }
            ApiError::NotFound(msg) => {
                tracing::info!(error = %msg, "resource not found");
                (StatusCode::NOT_FOUND, "Not found", msg)
            }
            ApiError::Duplicate(msg) => {
                tracing::warn!(error = %msg, "duplicate entry");
                (StatusCode::BAD_REQUEST, "Duplicate entry", msg)
            }
            ApiError::Reference(msg) => {
                tracing::warn!(error = %msg, "foreign key violation");
                (StatusCode::BAD_REQUEST, "Invalid reference", msg)
            }
            ApiError::Database(ref err) => {
                tracing::error!(error = %err, "database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Migration(ref err) => {
                tracing::error!(error = %err, "database migration error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Config(ref err) => {
                tracing::error!(error = %err, "configuration error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Io(ref err) => {
                tracing::error!(error = %err, "IO error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Serialization(ref err) => {
                tracing::error!(error = %err, "serialization error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Internal(ref msg) => {
                tracing::error!(error = %msg, "internal server error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
            ApiError::Anyhow(ref err) => {
                tracing::error!(error = %err, "unexpected error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn validation_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::validation("Team name is required"))
    }

    async fn not_found_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::not_found("Employee not found"))
    }

    async fn internal_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::internal("connection pool exhausted"))
    }

    async fn expired_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::TokenExpired)
    }

    #[tokio::test]
    async fn validation_error_maps_to_400_with_envelope() {
        let app = Router::new().route("/test", get(validation_handler));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Validation error");
        assert_eq!(body["message"], "Team name is required");
    }

    #[tokio::test]
    async fn not_found_error_maps_to_404() {
        let app = Router::new().route("/test", get(not_found_handler));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_error_hides_detail_from_client() {
        let app = Router::new().route("/test", get(internal_handler));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn expired_token_maps_to_401_with_distinct_kind() {
        let app = Router::new().route("/test", get(expired_handler));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Token expired");
    }

    #[test]
    fn error_constructors() {
        assert!(matches!(
            ApiError::validation("test"),
            ApiError::Validation(_)
        ));
        assert!(matches!(ApiError::not_found("test"), ApiError::NotFound(_)));
        assert!(matches!(ApiError::internal("test"), ApiError::Internal(_)));
        assert!(matches!(
            ApiError::authentication("test"),
            ApiError::Authentication(_)
        ));
        assert!(matches!(
            ApiError::unauthenticated("test"),
            ApiError::Unauthenticated(_)
        ));
    }

    #[test]
    fn row_not_found_is_not_special_cased() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::Database(_)));
    }
}
