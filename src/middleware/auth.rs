use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::TokenService;
use crate::error::ApiError;

/// State for the bearer-token middleware.
#[derive(Clone)]
pub struct AuthGate {
    pub tokens: Arc<TokenService>,
}

/// Bearer authentication middleware.
///
/// Verifies the Authorization header and attaches the resolved actor
/// context to the request. Everything behind this layer can rely on
/// `Extension<AuthContext>` being present.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers())?;
    let context = gate.tokens.verify(token)?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthenticated("No token provided"))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Invalid token format"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthenticated("No token provided"))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthenticated("Invalid token format"));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    use crate::auth::AuthContext;

    fn gate() -> AuthGate {
        AuthGate {
            tokens: Arc::new(TokenService::new("test-secret", 8)),
        }
    }

    async fn whoami(Extension(ctx): Extension<AuthContext>) -> String {
        format!("{}:{}", ctx.user_id, ctx.org_id)
    }

    fn app(gate: AuthGate) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(gate, require_auth))
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let request = HttpRequest::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let response = app(gate()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_header_is_unauthorized() {
        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app(gate()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_attaches_actor_context() {
        let gate = gate();
        let token = gate.tokens.issue(5, 9).unwrap();

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(gate).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn extract_bearer_trims_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer  abc ".parse().unwrap());
        assert_eq!(extract_bearer(&headers).unwrap(), "abc");
    }
}
