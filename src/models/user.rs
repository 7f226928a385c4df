use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub organisation_id: i64,
    pub created_at: DateTime<Utc>,
}

/// User joined with its organisation, as loaded on login.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithOrganisation {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub organisation_id: i64,
    pub organisation_name: String,
}
