use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{Employee, EmployeeTeamDetail};

/// Join row backing the teams-per-employee expansion on the list endpoint.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeTeamRef {
    pub employee_id: i64,
    pub team_id: i64,
    pub team_name: String,
}

/// Every method takes the acting organisation id, so tenant isolation holds
/// by construction rather than by per-call discipline.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(
        &self,
        org_id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Employee, ApiError>;

    async fn find_by_id(&self, org_id: i64, id: i64) -> Result<Option<Employee>, ApiError>;

    async fn find_many(&self, org_id: i64, ids: &[i64]) -> Result<Vec<Employee>, ApiError>;

    async fn list(&self, org_id: i64) -> Result<Vec<Employee>, ApiError>;

    /// All (employee, team) pairs for the organisation, for list expansion.
    async fn team_refs(&self, org_id: i64) -> Result<Vec<EmployeeTeamRef>, ApiError>;

    /// Teams a single employee belongs to, with assignment timestamps.
    async fn teams_for_employee(
        &self,
        org_id: i64,
        employee_id: i64,
    ) -> Result<Vec<EmployeeTeamDetail>, ApiError>;

    async fn update(
        &self,
        org_id: i64,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Employee, ApiError>;

    /// Returns the number of rows deleted (0 when absent or cross-tenant).
    async fn delete(&self, org_id: i64, id: i64) -> Result<u64, ApiError>;
}

pub struct SqlxEmployeeRepository {
    pool: PgPool,
}

impl SqlxEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for SqlxEmployeeRepository {
    async fn create(
        &self,
        org_id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Employee, ApiError> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (first_name, last_name, email, organisation_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, organisation_id, created_at, updated_at
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(org_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, org_id: i64, id: i64) -> Result<Option<Employee>, ApiError> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, organisation_id, created_at, updated_at
            FROM employees
            WHERE id = $1 AND organisation_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_many(&self, org_id: i64, ids: &[i64]) -> Result<Vec<Employee>, ApiError> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, organisation_id, created_at, updated_at
            FROM employees
            WHERE id = ANY($1) AND organisation_id = $2
            "#,
        )
        .bind(ids)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list(&self, org_id: i64) -> Result<Vec<Employee>, ApiError> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, first_name, last_name, email, organisation_id, created_at, updated_at
            FROM employees
            WHERE organisation_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn team_refs(&self, org_id: i64) -> Result<Vec<EmployeeTeamRef>, ApiError> {
        let rows = sqlx::query_as::<_, EmployeeTeamRef>(
            r#"
            SELECT et.employee_id, t.id AS team_id, t.name AS team_name
            FROM employee_teams et
            JOIN teams t ON t.id = et.team_id
            WHERE t.organisation_id = $1
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn teams_for_employee(
        &self,
        org_id: i64,
        employee_id: i64,
    ) -> Result<Vec<EmployeeTeamDetail>, ApiError> {
        let rows = sqlx::query_as::<_, EmployeeTeamDetail>(
            r#"
            SELECT t.id, t.name, t.description, et.assigned_at
            FROM employee_teams et
            JOIN teams t ON t.id = et.team_id
            WHERE et.employee_id = $1 AND t.organisation_id = $2
            ORDER BY et.assigned_at DESC
            "#,
        )
        .bind(employee_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(
        &self,
        org_id: i64,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Employee, ApiError> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET first_name = $3, last_name = $4, email = $5, updated_at = now()
            WHERE id = $1 AND organisation_id = $2
            RETURNING id, first_name, last_name, email, organisation_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, org_id: i64, id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
