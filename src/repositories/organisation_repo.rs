use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{Organisation, User};

#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    /// Create an organisation together with its first user, atomically.
    /// Either both rows commit or neither does.
    async fn create_with_owner(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(Organisation, User), ApiError>;
}

pub struct SqlxOrganisationRepository {
    pool: PgPool,
}

impl SqlxOrganisationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganisationRepository for SqlxOrganisationRepository {
    async fn create_with_owner(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(Organisation, User), ApiError> {
        let mut tx = self.pool.begin().await?;

        let organisation = sqlx::query_as::<_, Organisation>(
            r#"
            INSERT INTO organisations (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, organisation_id)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, organisation_id, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(organisation.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((organisation, user))
    }
}
