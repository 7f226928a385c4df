use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{Team, TeamMemberRow};

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(
        &self,
        org_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Team, ApiError>;

    async fn find_by_id(&self, org_id: i64, id: i64) -> Result<Option<Team>, ApiError>;

    async fn list(&self, org_id: i64) -> Result<Vec<Team>, ApiError>;

    /// All member rows for the organisation, for the list expansion.
    async fn members_for_org(&self, org_id: i64) -> Result<Vec<TeamMemberRow>, ApiError>;

    async fn members_for_team(
        &self,
        org_id: i64,
        team_id: i64,
    ) -> Result<Vec<TeamMemberRow>, ApiError>;

    async fn update(
        &self,
        org_id: i64,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Team, ApiError>;

    async fn delete(&self, org_id: i64, id: i64) -> Result<u64, ApiError>;

    /// Idempotent membership insert. Returns true when a new row was
    /// created, false when the pair was already assigned.
    async fn assign(&self, employee_id: i64, team_id: i64) -> Result<bool, ApiError>;

    /// Returns the number of join rows deleted (0 when not assigned).
    async fn unassign(&self, employee_id: i64, team_id: i64) -> Result<u64, ApiError>;
}

pub struct SqlxTeamRepository {
    pool: PgPool,
}

impl SqlxTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for SqlxTeamRepository {
    async fn create(
        &self,
        org_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Team, ApiError> {
        let row = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, organisation_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, organisation_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(org_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, org_id: i64, id: i64) -> Result<Option<Team>, ApiError> {
        let row = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, organisation_id, created_at, updated_at
            FROM teams
            WHERE id = $1 AND organisation_id = $2
            "#,
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, org_id: i64) -> Result<Vec<Team>, ApiError> {
        let rows = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, description, organisation_id, created_at, updated_at
            FROM teams
            WHERE organisation_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn members_for_org(&self, org_id: i64) -> Result<Vec<TeamMemberRow>, ApiError> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT et.team_id, e.id, e.first_name, e.last_name, e.email, et.assigned_at
            FROM employee_teams et
            JOIN employees e ON e.id = et.employee_id
            WHERE e.organisation_id = $1
            ORDER BY et.assigned_at DESC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn members_for_team(
        &self,
        org_id: i64,
        team_id: i64,
    ) -> Result<Vec<TeamMemberRow>, ApiError> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT et.team_id, e.id, e.first_name, e.last_name, e.email, et.assigned_at
            FROM employee_teams et
            JOIN employees e ON e.id = et.employee_id
            WHERE et.team_id = $1 AND e.organisation_id = $2
            ORDER BY et.assigned_at DESC
            "#,
        )
        .bind(team_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(
        &self,
        org_id: i64,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Team, ApiError> {
        let row = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = $3, description = $4, updated_at = now()
            WHERE id = $1 AND organisation_id = $2
            RETURNING id, name, description, organisation_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(org_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, org_id: i64, id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(org_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn assign(&self, employee_id: i64, team_id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO employee_teams (employee_id, team_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(employee_id)
        .bind(team_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn unassign(&self, employee_id: i64, team_id: i64) -> Result<u64, ApiError> {
        let result =
            sqlx::query("DELETE FROM employee_teams WHERE employee_id = $1 AND team_id = $2")
                .bind(employee_id)
                .bind(team_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
