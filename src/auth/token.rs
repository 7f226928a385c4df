use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::context::AuthContext;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    org: i64,
    iat: i64,
    exp: i64,
}

/// Issues and verifies the bearer tokens carried in the Authorization header.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn issue(&self, user_id: i64, org_id: i64) -> Result<String, ApiError> {
        self.issue_with_expiry(user_id, org_id, self.expiry)
    }

    fn issue_with_expiry(
        &self,
        user_id: i64,
        org_id: i64,
        expiry: Duration,
    ) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            org: org_id,
            iat: now.timestamp(),
            exp: (now + expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<AuthContext, ApiError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(AuthContext::new(data.claims.sub, data.claims.org)),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(ApiError::TokenExpired),
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => Err(ApiError::InvalidToken),
                _ => Err(ApiError::internal(format!(
                    "Token verification failed: {}",
                    e
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 8)
    }

    #[test]
    fn issued_token_round_trips_actor_context() {
        let tokens = service();
        let token = tokens.issue(42, 7).unwrap();

        let ctx = tokens.verify(&token).unwrap();
        assert_eq!(ctx.user_id, 42);
        assert_eq!(ctx.org_id, 7);
    }

    #[test]
    fn expired_token_is_reported_distinctly() {
        let tokens = service();
        let token = tokens
            .issue_with_expiry(1, 1, Duration::hours(-1))
            .unwrap();

        let err = tokens.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::TokenExpired));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let token = TokenService::new("other-secret", 8).issue(1, 1).unwrap();

        let err = service().verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = service().verify("not-a-token").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }
}
