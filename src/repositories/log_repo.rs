use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{LogFilter, LogWithUser};

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Append-only insert; never reads or mutates existing rows.
    async fn insert(
        &self,
        org_id: i64,
        user_id: i64,
        action: &str,
        meta: serde_json::Value,
    ) -> Result<(), ApiError>;

    /// Filtered page of audit rows plus the total count matching the filter,
    /// always scoped to the organisation, newest first.
    async fn query(
        &self,
        org_id: i64,
        filter: &LogFilter,
    ) -> Result<(Vec<LogWithUser>, i64), ApiError>;
}

pub struct SqlxLogRepository {
    pool: PgPool,
}

impl SqlxLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogRepository for SqlxLogRepository {
    async fn insert(
        &self,
        org_id: i64,
        user_id: i64,
        action: &str,
        meta: serde_json::Value,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO logs (organisation_id, user_id, action, meta)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .bind(action)
        .bind(meta)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(
        &self,
        org_id: i64,
        filter: &LogFilter,
    ) -> Result<(Vec<LogWithUser>, i64), ApiError> {
        let mut where_clauses = vec!["l.organisation_id = $1".to_string()];
        let mut param_index = 2;

        if filter.action.is_some() {
            where_clauses.push(format!("l.action = ${}", param_index));
            param_index += 1;
        }

        if filter.user_id.is_some() {
            where_clauses.push(format!("l.user_id = ${}", param_index));
            param_index += 1;
        }

        if filter.start_date.is_some() {
            where_clauses.push(format!("l.timestamp >= ${}", param_index));
            param_index += 1;
        }

        if filter.end_date.is_some() {
            where_clauses.push(format!("l.timestamp <= ${}", param_index));
            param_index += 1;
        }

        let where_sql = format!("WHERE {}", where_clauses.join(" AND "));

        let limit = filter.limit.clamp(1, 1000);
        let offset = filter.offset.max(0);

        let count_sql = format!("SELECT COUNT(*) FROM logs l {}", where_sql);

        let main_sql = format!(
            r#"
            SELECT l.id, l.organisation_id, l.user_id, l.action, l.meta, l.timestamp,
                   u.email AS user_email
            FROM logs l
            JOIN users u ON u.id = l.user_id
            {}
            ORDER BY l.timestamp DESC, l.id DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_sql,
            param_index,
            param_index + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(org_id);
        let mut main_query = sqlx::query_as::<_, LogWithUser>(&main_sql).bind(org_id);

        if let Some(ref action) = filter.action {
            count_query = count_query.bind(action);
            main_query = main_query.bind(action);
        }

        if let Some(user_id) = filter.user_id {
            count_query = count_query.bind(user_id);
            main_query = main_query.bind(user_id);
        }

        if let Some(start_date) = filter.start_date {
            count_query = count_query.bind(start_date);
            main_query = main_query.bind(start_date);
        }

        if let Some(end_date) = filter.end_date {
            count_query = count_query.bind(end_date);
            main_query = main_query.bind(end_date);
        }

        main_query = main_query.bind(limit).bind(offset);

        let total = count_query.fetch_one(&self.pool).await?;
        let logs = main_query.fetch_all(&self.pool).await?;

        Ok((logs, total))
    }
}
