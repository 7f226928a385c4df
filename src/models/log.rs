use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit row joined with the acting user's identity for the read path.
/// Rows are append-only, never updated or deleted once written.
#[derive(Debug, Clone, FromRow)]
pub struct LogWithUser {
    pub id: i64,
    pub organisation_id: i64,
    pub user_id: i64,
    pub action: String,
    pub meta: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogUser {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogView {
    pub id: i64,
    pub organisation_id: i64,
    pub user_id: i64,
    pub action: String,
    pub meta: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub user: LogUser,
}

impl From<LogWithUser> for LogView {
    fn from(row: LogWithUser) -> Self {
        Self {
            id: row.id,
            organisation_id: row.organisation_id,
            user_id: row.user_id,
            action: row.action,
            meta: row.meta,
            timestamp: row.timestamp,
            user: LogUser {
                id: row.user_id,
                email: row.user_email,
            },
        }
    }
}

/// Query filters for the audit read path; all optional, always scoped to the
/// caller's organisation by the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    pub action: Option<String>,
    pub user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub total: i64,
    pub count: usize,
    pub limit: i64,
    pub offset: i64,
    pub logs: Vec<LogView>,
}
