use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::UserWithOrganisation;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Email lookup is deliberately unscoped: it backs login and the
    /// duplicate-email check at registration, both of which happen before a
    /// tenant is known.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithOrganisation>, ApiError>;
}

pub struct SqlxUserRepository {
    pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserWithOrganisation>, ApiError> {
        let row = sqlx::query_as::<_, UserWithOrganisation>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.organisation_id, o.name AS organisation_name
            FROM users u
            JOIN organisations o ON o.id = u.organisation_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
